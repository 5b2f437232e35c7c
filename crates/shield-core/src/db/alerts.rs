//! Analysis persistence and alert retrieval

use rusqlite::params;
use serde::Serialize;
use tracing::warn;

use super::{Collection, Database};
use crate::error::Result;
use crate::models::{Alert, AnalysisRequest, AnalysisResult};

/// Outcome of a best-effort [`Database::persist_analysis`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersistReport {
    /// Documents stored
    pub written: usize,
    /// Documents that could not be stored
    pub failed: usize,
    pub errors: Vec<String>,
}

impl PersistReport {
    /// True when every document was stored
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }

    fn record<T>(&mut self, what: &str, outcome: Result<T>) {
        match outcome {
            Ok(_) => self.written += 1,
            Err(e) => {
                warn!("Failed to store {}: {}", what, e);
                self.failed += 1;
                self.errors.push(format!("{}: {}", what, e));
            }
        }
    }
}

impl Database {
    /// Alerts persisted for a user, oldest first
    pub fn list_alerts_for_user(&self, email: &str) -> Result<Vec<Alert>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT body FROM documents WHERE collection = ? AND user_email = ? ORDER BY id",
        )?;

        let bodies = stmt
            .query_map(params![Collection::Alert.as_str(), email], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut alerts = Vec::with_capacity(bodies.len());
        for body in bodies {
            alerts.push(serde_json::from_str(&body)?);
        }
        Ok(alerts)
    }

    /// Store the profile, each transaction, the result, and each alert
    ///
    /// Each document is written independently. Failures are logged and
    /// counted in the report; they never abort the remaining writes.
    pub fn persist_analysis(
        &self,
        request: &AnalysisRequest,
        result: &AnalysisResult,
    ) -> PersistReport {
        let email = request.profile.email.as_str();
        let mut report = PersistReport::default();

        report.record(
            "profile",
            self.insert_document(Collection::FinancialProfile, email, &request.profile),
        );

        for (i, tx) in request.transactions.iter().enumerate() {
            report.record(
                &format!("transaction {}", i + 1),
                self.insert_document(Collection::Transaction, email, tx),
            );
        }

        report.record(
            "analysis result",
            self.insert_document(Collection::AnalysisResult, email, result),
        );

        for alert in &result.alerts {
            report.record(
                &format!("alert {}", alert.alert_type),
                self.insert_document(Collection::Alert, &alert.user_email, alert),
            );
        }

        if !report.is_complete() {
            warn!(
                user = %email,
                written = report.written,
                failed = report.failed,
                "Analysis only partially persisted"
            );
        }

        report
    }
}
