//! Account registration.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    Form,
};

use crate::app_state::AppState;
use crate::domain::auth::hash_password;
use crate::domain::{DuplicateField, NewUser, RepositoryError};
use crate::extract::CurrentUser;
use crate::handlers::shared_types::{page_context, redirect_with, Messages, PageError};
use crate::render::LayoutChoice;
use crate::validation::{validate_registration, RegistrationForm};

/// GET /register
pub async fn register_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(messages): Query<Messages>,
) -> Result<Response, PageError> {
    // ---
    if user.is_some() {
        return Ok(redirect_with("/", "info", "You are already logged in").into_response());
    }

    let title = format!("Register - {}", state.instance_name());
    let ctx = page_context(&state, &None, &title, Some("register"), &messages);

    let html = state
        .renderer()
        .render("register.html", LayoutChoice::Named("homepage".into()), ctx)
        .map_err(|e| PageError::internal(state.env_name(), e))?;

    Ok(Html(html).into_response())
}

/// POST /register
///
/// Validate every field, check both unique columns, then create the
/// profile and credential rows in one transaction. Duplicate hits give a
/// field-level message; everything else fails with a generic retry
/// message that never echoes store internals.
#[tracing::instrument(skip(state, form))]
pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> Response {
    // ---
    let input = match validate_registration(&form) {
        Ok(input) => input,
        Err(errors) => {
            return redirect_with("/register", "error", &errors.join(". ")).into_response();
        }
    };

    // Pre-checks give friendlier messages; the unique constraints remain
    // the authority and are mapped below if a concurrent insert wins.
    let mut errors = Vec::new();
    match state.repository().email_exists(&input.email).await {
        Ok(true) => errors.push(DuplicateField::Email.user_message().to_string()),
        Ok(false) => {}
        Err(err) => {
            tracing::error!("Registration lookup failed: {err}");
            return registration_unavailable();
        }
    }
    match state.repository().username_exists(&input.username).await {
        Ok(true) => errors.push(DuplicateField::Username.user_message().to_string()),
        Ok(false) => {}
        Err(err) => {
            tracing::error!("Registration lookup failed: {err}");
            return registration_unavailable();
        }
    }
    if !errors.is_empty() {
        return redirect_with("/register", "error", &errors.join(". ")).into_response();
    }

    let password_hash = match hash_password(input.password.clone()).await {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!("Password hashing failed: {err}");
            return registration_unavailable();
        }
    };

    let new_user = NewUser {
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        username: input.username.clone(),
        password_hash,
    };

    match state.repository().create_user(new_user).await {
        Ok(user_id) => {
            state.metrics().record_registration();
            tracing::info!("Registered user {} (id {user_id})", input.username);
            redirect_with(
                "/login",
                "success",
                "Registration successful! Please log in with your credentials.",
            )
            .into_response()
        }
        Err(RepositoryError::Duplicate(field)) => {
            redirect_with("/register", "error", field.user_message()).into_response()
        }
        Err(err) => {
            tracing::error!("Registration failed: {err}");
            registration_unavailable()
        }
    }
}

fn registration_unavailable() -> Response {
    // ---
    redirect_with("/register", "error", "Registration failed. Please try again.").into_response()
}
