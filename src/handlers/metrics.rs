use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse};

use crate::app_state::AppState;

/// GET /metrics
///
/// Prometheus exposition of the portal's counters: login outcomes,
/// completed registrations, and per-layout page render counts and
/// timings. With the no-op backend configured the body is empty, which
/// scrapers treat as a target with no series.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    // ---
    let body = state.metrics().render();

    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}
