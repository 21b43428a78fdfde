use crate::domain::Metrics;
use std::time::Instant;

/// No-op metrics implementation for testing.
pub struct NoopMetrics;

impl NoopMetrics {
    pub fn new() -> Self {
        NoopMetrics
    }
}

impl Metrics for NoopMetrics {
    // ---
    fn render(&self) -> String {
        String::new()
    }
    fn record_login_success(&self) {}
    fn record_login_failure(&self) {}
    fn record_registration(&self) {}
    fn record_page_render(&self, _: Instant, _: &str) {}
}
