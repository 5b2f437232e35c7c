//! Alert handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{AppError, AppState};
use shield_core::models::Alert;

/// GET /api/alerts/:email - List stored alerts for a user
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Alert>>, AppError> {
    let db = state
        .db
        .as_ref()
        .ok_or_else(|| AppError::internal("Database not available"))?;

    let alerts = db.list_alerts_for_user(&email)?;

    Ok(Json(alerts))
}
