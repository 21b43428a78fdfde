//! Role-gated admin dashboard.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::app_state::AppState;
use crate::domain::Role;
use crate::extract::CurrentUser;
use crate::handlers::shared_types::{page_context, redirect_with, Messages, PageError};
use crate::render::LayoutChoice;

/// GET /admin
///
/// The authorization gate distinguishes its two denials: anonymous
/// sessions are redirected to login, while an authenticated user without
/// the admin role gets an in-place 403 page. It never silently allows.
#[tracing::instrument(skip(state, user))]
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, PageError> {
    // ---
    let Some(user) = user else {
        return Ok(redirect_with("/login", "error", "Authentication required").into_response());
    };

    if user.role != Role::Admin {
        let mut ctx = page_context(
            &state,
            &Some(user),
            "Access Denied",
            None,
            &Messages::default(),
        );
        ctx.insert("error", "You do not have permission to access this page");

        let html = state
            .renderer()
            .render("error.html", LayoutChoice::Named("homepage".into()), ctx)
            .map_err(|e| PageError::internal(state.env_name(), e))?;

        return Ok((StatusCode::FORBIDDEN, Html(html)).into_response());
    }

    let layouts = state.renderer().layouts();
    let available: serde_json::Map<String, serde_json::Value> = layouts
        .iter()
        .map(|(name, template)| (name.to_string(), json!(template)))
        .collect();

    let mut ctx = page_context(
        &state,
        &Some(user),
        "Admin Dashboard",
        None,
        &Messages::default(),
    );
    ctx.insert("available_layouts", &available);

    let html = state
        .renderer()
        .render(
            "admin-dashboard.html",
            LayoutChoice::Named("admin".into()),
            ctx,
        )
        .map_err(|e| PageError::internal(state.env_name(), e))?;

    Ok(Html(html).into_response())
}
