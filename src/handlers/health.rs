use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    // ---
    status: &'static str,
    environment: &'static str,
    timestamp: String,
    uptime: f64,
}

/// GET /api/health
///
/// Liveness payload for external monitors: process status, environment
/// name, current timestamp, and seconds of uptime.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // ---
    Json(HealthResponse {
        status: "OK",
        environment: state.env_name().as_str(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime: state.uptime_secs(),
    })
}
