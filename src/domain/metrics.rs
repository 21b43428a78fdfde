use std::sync::Arc;
use std::time::Instant;

/// Abstraction for application metrics (counters, histograms).
pub trait Metrics: Send + Sync + 'static {
    // ---
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> String;

    /// Record a successful login.
    fn record_login_success(&self);

    /// Record a rejected login attempt.
    fn record_login_failure(&self);

    /// Record a completed registration.
    fn record_registration(&self);

    /// Record a page render and its duration, labeled by resolved layout.
    fn record_page_render(&self, start: Instant, layout: &str);
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;
