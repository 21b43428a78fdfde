//! Request identity resolution and session cookie plumbing.
//!
//! `CurrentUser` is how handlers learn who is making the request: it reads
//! the session cookie, asks the session store (which applies the rolling
//! refresh), and yields the snapshot or nothing. It never rejects:
//! anonymous is a normal state, and store failures degrade to anonymous
//! rather than erroring every public page.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::time::Duration;

use crate::app_state::AppState;
use crate::domain::AuthenticatedUser;

/// Resolved identity of the requesting session, if any.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<AuthenticatedUser>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // ---
        let state = AppState::from_ref(state);

        let Some(token) = session_token(&parts.headers, &state.session_config().cookie_name)
        else {
            return Ok(CurrentUser(None));
        };

        match state.sessions().load(&token).await {
            Ok(Some(record)) => Ok(CurrentUser(Some(record.user))),
            Ok(None) => Ok(CurrentUser(None)),
            Err(err) => {
                // A broken session backend must not take down public pages.
                tracing::error!("Session lookup failed: {err}");
                Ok(CurrentUser(None))
            }
        }
    }
}

/// Extracts the session token from the request's Cookie header.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    // ---
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').map(str::trim).find_map(|pair| {
        pair.strip_prefix(cookie_name)
            .and_then(|rest| rest.strip_prefix('='))
            .map(str::to_string)
    })
}

/// Builds the Set-Cookie value that hands a session token to the client.
///
/// httpOnly and SameSite=Lax always; Secure only in deployments behind
/// HTTPS.
pub fn session_cookie(cookie_name: &str, token: &str, max_age: Duration, secure: bool) -> String {
    // ---
    let mut cookie = format!(
        "{cookie_name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds the Set-Cookie value that removes the session cookie.
pub fn clear_session_cookie(cookie_name: &str) -> String {
    // ---
    format!("{cookie_name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
