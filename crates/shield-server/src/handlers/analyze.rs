//! Analysis handler

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info, warn};

use crate::{AppError, AppState};
use shield_core::analysis::analyze_financial_protection;
use shield_core::models::{AnalysisRequest, AnalysisResult};

/// POST /api/analyze - Analyze a profile and its transactions
///
/// The result is returned whether or not it could be stored.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(request) = body.map_err(|e| AppError::bad_request(&e.body_text()))?;

    request
        .validate()
        .map_err(|e| AppError::bad_request(&e.to_string()))?;

    let result = analyze_financial_protection(&request.profile, &request.transactions);

    match &state.db {
        Some(db) => {
            let report = db.persist_analysis(&request, &result);
            if report.is_complete() {
                info!(
                    user = %request.profile.email,
                    score = result.score,
                    documents = report.written,
                    "Analysis stored"
                );
            } else {
                warn!(
                    user = %request.profile.email,
                    written = report.written,
                    failed = report.failed,
                    "Analysis returned without full persistence"
                );
            }
        }
        None => warn!("No database configured, analysis not stored"),
    }

    Ok(Json(result))
}
