use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// Liveness probe. Answers as long as the process serves HTTP.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "summary-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: fails while the Gemini client is not initialized.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if state.recommendations.is_ready() {
        Ok(Json(json!({
            "status": "ready",
            "model": state.config.gemini.model
        })))
    } else {
        Err(AppError::ServiceUnavailable)
    }
}
