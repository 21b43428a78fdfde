use metrics::{counter, histogram};
use std::time::Instant;

/// Increment the successful-login counter.
pub fn increment_login_success() {
    counter!("logins_total", "outcome" => "success").increment(1);
}

/// Increment the rejected-login counter.
pub fn increment_login_failure() {
    counter!("logins_total", "outcome" => "failure").increment(1);
}

/// Increment the completed-registrations counter.
pub fn increment_registration() {
    counter!("registrations_total").increment(1);
}

/// Track a page render: count per layout and record the duration.
pub fn track_page_render(start: Instant, layout: &str) {
    counter!("page_renders_total", "layout" => layout.to_string()).increment(1);

    let elapsed = start.elapsed();
    histogram!("page_render_duration_seconds").record(elapsed);
}
