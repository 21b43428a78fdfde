// src/lib.rs
use anyhow::Result;
use axum::{routing::get, Router};
use std::env;
use std::sync::Arc;

use handlers::{
    about, admin_dashboard, blog, forgot_password_form, forgot_password_submit, health_check,
    home, layouts_index, login_form, login_submit, logout, metrics_handler, not_found,
    register_form, register_submit,
};

// Public exports (visible outside this module)
pub mod domain;
pub mod render;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod extract;
mod handlers;
mod infrastructure;
mod validation;

// Hoist up only the public symbol(s)
pub use app_state::AppState;
pub use config::*;
pub use extract::CurrentUser;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_noop_metrics, // ---
    create_postgres_repository,
    create_prom_metrics,
    create_session_store,
    init_pg_pool,
    MemorySessionStore,
};

/// Build the HTTP router with metrics implementation determined by environment variables.
pub async fn create_router() -> Result<Router> {
    // ---
    // Load all configuration from environment
    let config = AppConfig::from_env()?;

    // Determine metrics implementation from environment
    let metrics_type = env::var("PORTAL_METRICS_TYPE").unwrap_or_else(|_| "noop".to_string());
    let metrics = if metrics_type == "prom" {
        create_prom_metrics()?
    } else {
        create_noop_metrics()?
    };

    tracing_subscriber::fmt::try_init().ok(); // Ignores if already initialized

    // Create infrastructure dependencies
    let pool = init_pg_pool(&config.database).await?;
    let repository = create_postgres_repository(pool);
    let sessions = create_session_store(&config.session).await;
    let renderer = Arc::new(render::Renderer::new(
        &config.server.templates_dir,
        metrics.clone(),
    )?);

    // Build application state with all dependencies
    let app_state = AppState::new(
        repository,
        sessions,
        metrics,
        renderer,
        config.server,
        config.session,
    );

    Ok(build_router(app_state))
}

/// Assemble the route table over an already-constructed [`AppState`].
///
/// Split out from [`create_router`] so tests can wire in their own
/// repository and session store without touching Postgres or Redis.
pub fn build_router(app_state: AppState) -> Router {
    // ---
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/blog", get(blog))
        .route("/login", get(login_form).post(login_submit))
        .route("/register", get(register_form).post(register_submit))
        .route("/logout", get(logout))
        .route(
            "/forgot-password",
            get(forgot_password_form).post(forgot_password_submit),
        )
        .route("/admin", get(admin_dashboard))
        .route("/layouts", get(layouts_index))
        .route("/api/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .fallback(not_found)
        .with_state(app_state)
}
