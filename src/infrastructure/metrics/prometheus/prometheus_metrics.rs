//! Prometheus metrics implementation.
//!
//! Concrete implementation of the `Metrics` trait in Prometheus format.
//! It delegates to utility functions in sibling modules (`counters.rs`,
//! `recorder.rs`) which handle the actual metrics collection via the
//! global `metrics` crate registry.
//!
//! The implementation follows a global registry pattern where metrics are
//! automatically registered when first used, and a single global handle
//! manages rendering all collected metrics in Prometheus text format.

use crate::domain::Metrics;
use std::time::Instant;

/// Prometheus-based metrics implementation.
///
/// This struct is intentionally empty because we use the global metrics registry
/// pattern via the `metrics` crate. All metrics are registered globally using
/// macros like `counter!()` and `histogram!()`, and the global PrometheusHandle
/// stored in `recorder.rs` manages the actual metrics collection and rendering.
pub struct PrometheusMetrics {
    // Empty - uses global metrics registry pattern
}

impl PrometheusMetrics {
    pub fn new() -> Self {
        tracing::info!("Creating Prometheus metrics");
        PrometheusMetrics {}
    }
}

impl Metrics for PrometheusMetrics {
    fn render(&self) -> String {
        super::render_metrics()
    }

    fn record_login_success(&self) {
        super::increment_login_success();
    }

    fn record_login_failure(&self) {
        super::increment_login_failure();
    }

    fn record_registration(&self) {
        super::increment_registration();
    }

    fn record_page_render(&self, start: Instant, layout: &str) {
        super::track_page_render(start, layout);
    }
}
