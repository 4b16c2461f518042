//! # Alert Handlers
//!
//! - `POST /submit-report` - File a symptom report, creating a map alert
//! - `GET /alerts` - List every alert
//!
//! ```bash
//! curl -X POST http://localhost:5000/submit-report \
//!   -H "Content-Type: application/json" \
//!   -d '{"location": "Kochi", "description": "red, itchy eyes"}'
//! ```

use crate::services::AlertService;
use axum::{extract::State, http::StatusCode, Json};
use lib_core::dto::{AlertResponse, ReportRequest};
use lib_core::{AppError, DbPool};
use tracing::{info, instrument, warn};

/// File a symptom report.
///
/// **Route**: `POST /submit-report`
///
/// Success (201): the created alert
///
/// Error (400): `location` or `description` missing or blank
#[instrument(skip_all)]
pub async fn submit_report(
    State(db): State<DbPool>,
    Json(report): Json<ReportRequest>,
) -> Result<(StatusCode, Json<AlertResponse>), AppError> {
    let alert = AlertService::new(db).submit_report(report).await.map_err(|e| {
        warn!("[ALERTS] Report rejected: {}", e);
        e
    })?;

    info!("[ALERTS] Alert created: {}", alert.title);
    Ok((StatusCode::CREATED, Json(alert)))
}

/// **Route**: `GET /alerts`
pub async fn list_alerts(State(db): State<DbPool>) -> Result<Json<Vec<AlertResponse>>, AppError> {
    let alerts = AlertService::new(db).list_alerts().await?;
    Ok(Json(alerts))
}
