//! Login and logout.
//!
//! The full login chain is: validate → authenticate → create session →
//! redirect. Each step gates the next, and every failure path leaves via
//! a redirect carrying a user-facing message.

use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::domain::auth::{verify_credentials, AuthError};
use crate::extract::{clear_session_cookie, session_cookie, session_token, CurrentUser};
use crate::handlers::shared_types::{page_context, redirect_with, Messages, PageError};
use crate::render::LayoutChoice;

/// GET /login
///
/// Renders the login form. Already-authenticated sessions are bounced to
/// the landing page instead of being offered a second login.
pub async fn login_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(messages): Query<Messages>,
) -> Result<Response, PageError> {
    // ---
    if user.is_some() {
        return Ok(redirect_with("/", "info", "You are already logged in").into_response());
    }

    let title = format!("Login - {}", state.instance_name());
    let ctx = page_context(&state, &None, &title, Some("login"), &messages);

    let html = state
        .renderer()
        .render("login.html", LayoutChoice::Named("homepage".into()), ctx)
        .map_err(|e| PageError::internal(state.env_name(), e))?;

    Ok(Html(html).into_response())
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    // ---
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /login
///
/// On success: session created, cookie set, redirect home with a welcome
/// message. On any credential failure: redirect back with one generic
/// message that never says which part was wrong.
#[tracing::instrument(skip(state, form))]
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    // ---
    let input = match crate::validation::validate_login(&form.username, &form.password) {
        Ok(input) => input,
        Err(message) => return redirect_with("/login", "error", &message).into_response(),
    };

    let user = match verify_credentials(state.repository(), &input.username, &input.password).await
    {
        Ok(user) => user,
        Err(err) => {
            state.metrics().record_login_failure();
            match &err {
                AuthError::UserNotFound | AuthError::InvalidPassword => {
                    tracing::info!("Login failed for: {}", input.username);
                }
                other => {
                    tracing::error!("Login error for {}: {other}", input.username);
                }
            }
            return redirect_with("/login", "error", err.user_message()).into_response();
        }
    };

    let token = match state.sessions().create(user.clone()).await {
        Ok(token) => token,
        Err(err) => {
            tracing::error!("Session creation failed: {err}");
            return redirect_with(
                "/login",
                "error",
                "Could not start your session. Please try again.",
            )
            .into_response();
        }
    };

    state.metrics().record_login_success();
    tracing::info!("Login successful for: {}", user.username);

    let session_cfg = state.session_config();
    let cookie = session_cookie(
        &session_cfg.cookie_name,
        &token,
        session_cfg.ttl,
        session_cfg.secure_cookie,
    );
    let welcome = format!("Welcome back, {}!", user.username);

    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        redirect_with("/", "success", &welcome),
    )
        .into_response()
}

/// GET /logout
///
/// Destroys the store-side session first; the cookie is only cleared once
/// that succeeds. Otherwise the client would keep presenting a token the
/// store still honors.
#[tracing::instrument(skip(state, headers))]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    // ---
    let cookie_name = &state.session_config().cookie_name;

    let Some(token) = session_token(&headers, cookie_name) else {
        return redirect_with("/login", "success", "Successfully logged out").into_response();
    };

    match state.sessions().destroy(&token).await {
        Ok(()) => {
            tracing::info!("User logged out");
            (
                AppendHeaders([(SET_COOKIE, clear_session_cookie(cookie_name))]),
                redirect_with("/login", "success", "Successfully logged out"),
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!("Error destroying session: {err}");
            redirect_with("/", "error", "Error logging out").into_response()
        }
    }
}
