//! Shared handler plumbing: flash messages, redirects, page context, and
//! the top-level error response.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use tera::Context;

use crate::app_state::AppState;
use crate::config::EnvName;
use crate::domain::AuthenticatedUser;

/// Flash messages carried between requests via query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Messages {
    // ---
    pub success: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
    pub info: Option<String>,
}

/// 303-style redirect carrying one message as a query parameter.
pub fn redirect_with(path: &str, kind: &str, message: &str) -> Redirect {
    // ---
    let query = serde_urlencoded::to_string([(kind, message)]).unwrap_or_default();
    Redirect::to(&format!("{path}?{query}"))
}

/// Builds the base template context every view receives.
///
/// The user snapshot and authentication flag are injected into all views
/// so navigation and greetings render consistently regardless of route.
pub fn page_context(
    state: &AppState,
    user: &Option<AuthenticatedUser>,
    title: &str,
    active_page: Option<&str>,
    messages: &Messages,
) -> Context {
    // ---
    let mut ctx = Context::new();

    ctx.insert("app_name", state.instance_name());
    ctx.insert("env_name", state.env_name().as_str());
    ctx.insert("base_url", state.base_url());
    ctx.insert("title", title);
    ctx.insert("active_page", &active_page);
    ctx.insert("messages", messages);
    ctx.insert("user", user);
    ctx.insert("is_authenticated", &user.is_some());

    ctx
}

/// Top-level failure response for errors no handler recovered from.
///
/// Renders a plain error page; the underlying detail is logged and only
/// echoed to the client outside production.
pub struct PageError {
    // ---
    status: StatusCode,
    detail: Option<String>,
}

impl PageError {
    // ---
    pub fn internal(env: EnvName, err: impl std::fmt::Display) -> Self {
        // ---
        tracing::error!("Unhandled error: {err}");

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: (!env.is_production()).then(|| err.to_string()),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        // ---
        let detail = self
            .detail
            .map(|d| format!("<pre>{}</pre>", tera::escape_html(&d)))
            .unwrap_or_default();

        let body = format!(
            "<!doctype html><html><body><h1>Server Error</h1>\
             <p>Something went wrong. Please try again.</p>{detail}</body></html>"
        );

        (self.status, Html(body)).into_response()
    }
}
