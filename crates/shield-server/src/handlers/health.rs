//! Root and health handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

/// Longest storage error text echoed in the health report
const MAX_ERROR_CHARS: usize = 50;

/// Backend and storage status
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub backend: String,
    pub database: String,
    pub database_path: Option<String>,
    pub encrypted: Option<bool>,
    pub connection_status: String,
    pub collections: Vec<String>,
    /// Document count per collection
    pub documents: BTreeMap<String, i64>,
}

/// GET / - Service banner
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Financial Protection AI Agent Backend" }))
}

/// GET /api/health - Backend and storage diagnostics
///
/// Always succeeds; storage problems are reported in the body.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    let mut report = HealthReport {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_path: None,
        encrypted: None,
        connection_status: "Not Connected".to_string(),
        collections: vec![],
        documents: BTreeMap::new(),
    };

    let Some(db) = &state.db else {
        return Json(report);
    };

    report.database_path = Some(db.path().to_string());

    if let Err(e) = db.conn() {
        report.database = format!("❌ Error: {}", truncate(&e.to_string()));
        return Json(report);
    }
    report.connection_status = "Connected".to_string();
    report.encrypted = db.is_encrypted().ok();

    match db.list_collections() {
        Ok(collections) => {
            report.database = "✅ Connected & Working".to_string();
            for c in collections {
                report.collections.push(c.name.clone());
                report.documents.insert(c.name, c.count);
            }
        }
        Err(e) => {
            report.database = format!("⚠️  Connected but Error: {}", truncate(&e.to_string()));
        }
    }

    Json(report)
}

fn truncate(s: &str) -> String {
    s.chars().take(MAX_ERROR_CHARS).collect()
}
