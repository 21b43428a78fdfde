//! Static content pages: home, about, blog, forgot-password, the layout
//! listing, and the 404 fallback.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    Form,
};
use serde::Deserialize;
use serde_json::json;

use crate::app_state::AppState;
use crate::extract::CurrentUser;
use crate::handlers::shared_types::{page_context, redirect_with, Messages, PageError};
use crate::render::LayoutChoice;

/// GET /
///
/// Landing page. Flash messages arrive via query parameters after
/// redirects from login, logout, and registration.
#[tracing::instrument(skip(state, user, messages))]
pub async fn home(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(messages): Query<Messages>,
) -> Result<impl IntoResponse, PageError> {
    // ---
    let title = format!("Welcome to {}", state.instance_name());
    let mut ctx = page_context(&state, &user, &title, Some("home"), &messages);
    ctx.insert(
        "description",
        &format!("{} - a server-rendered portal", state.instance_name()),
    );

    let html = state
        .renderer()
        .render("index.html", LayoutChoice::Named("homepage".into()), ctx)
        .map_err(|e| PageError::internal(state.env_name(), e))?;

    Ok(Html(html))
}

/// GET /about
pub async fn about(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, PageError> {
    // ---
    let title = format!("About - {}", state.instance_name());
    let ctx = page_context(&state, &user, &title, Some("about"), &Messages::default());

    let html = state
        .renderer()
        .render("about.html", LayoutChoice::Named("homepage".into()), ctx)
        .map_err(|e| PageError::internal(state.env_name(), e))?;

    Ok(Html(html))
}

/// GET /blog
///
/// Uses the blog layout rather than the homepage one.
pub async fn blog(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, PageError> {
    // ---
    let ctx = page_context(&state, &user, "My Blog", Some("blog"), &Messages::default());

    let html = state
        .renderer()
        .render("blog-home.html", LayoutChoice::Named("blog".into()), ctx)
        .map_err(|e| PageError::internal(state.env_name(), e))?;

    Ok(Html(html))
}

/// GET /forgot-password
pub async fn forgot_password_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(messages): Query<Messages>,
) -> Result<impl IntoResponse, PageError> {
    // ---
    let title = format!("Forgot Password - {}", state.instance_name());
    let ctx = page_context(&state, &user, &title, None, &messages);

    let html = state
        .renderer()
        .render(
            "forgot-password.html",
            LayoutChoice::Named("homepage".into()),
            ctx,
        )
        .map_err(|e| PageError::internal(state.env_name(), e))?;

    Ok(Html(html))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    // ---
    #[serde(default)]
    pub email: String,
}

/// POST /forgot-password
///
/// Accepts the address and confirms unconditionally; actual reset mail
/// delivery is out of scope. The confirmation is the same whether or not
/// the address is registered, for the same enumeration-resistance reason
/// login failures are generic.
#[tracing::instrument(skip(form))]
pub async fn forgot_password_submit(Form(form): Form<ForgotPasswordForm>) -> impl IntoResponse {
    // ---
    let email = form.email.trim();
    if email.is_empty() {
        return redirect_with("/forgot-password", "error", "Please enter your email address");
    }

    tracing::info!("Password reset requested for: {email}");
    redirect_with(
        "/forgot-password",
        "success",
        "Password reset instructions have been sent to your email",
    )
}

/// GET /layouts
///
/// Diagnostic listing of the layouts discovered at startup.
pub async fn layouts_index(State(state): State<AppState>) -> impl IntoResponse {
    // ---
    let layouts = state.renderer().layouts();
    let available: serde_json::Map<String, serde_json::Value> = layouts
        .iter()
        .map(|(name, template)| (name.to_string(), json!(template)))
        .collect();
    let names: Vec<&str> = layouts.names().collect();

    Json(json!({
        "availableLayouts": available,
        "totalLayouts": layouts.len(),
        "layoutNames": names,
    }))
}

/// Fallback for unmatched routes: a rendered 404 page.
pub async fn not_found(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, PageError> {
    // ---
    let ctx = page_context(&state, &user, "Page Not Found", None, &Messages::default());

    let html = state
        .renderer()
        .render("404.html", LayoutChoice::Named("homepage".into()), ctx)
        .map_err(|e| PageError::internal(state.env_name(), e))?;

    Ok((StatusCode::NOT_FOUND, Html(html)))
}
