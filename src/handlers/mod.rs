//! HTTP request handlers.
//!
//! This is the gateway module for all route handlers. Submodules are
//! private; everything the router needs is re-exported here.

// ---
mod admin;
mod auth;
mod health;
mod metrics;
mod pages;
mod register;
mod shared_types;

// ---
pub use admin::dashboard as admin_dashboard;
pub use auth::{login_form, login_submit, logout};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use pages::{
    about, blog, forgot_password_form, forgot_password_submit, home, layouts_index, not_found,
};
pub use register::{register_form, register_submit};
pub use shared_types::{page_context, redirect_with, Messages, PageError};
