//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` contains shared
//! resources: the credential repository, the session store, the metrics
//! implementation, the renderer, and site identity configuration.
//!
//! The state is designed to be cheaply cloneable (using `Arc` internally
//! where needed) so it can be passed efficiently to each request handler
//! without expensive copying of resources.

use crate::config::{EnvName, ServerConfig, SessionConfig};
use crate::domain::{MetricsPtr, RepositoryPtr, SessionStorePtr};
use crate::render::Renderer;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state passed to all Axum handlers.
///
/// Built once at startup and never mutated afterwards. Handlers depend on
/// the `Repository` and `SessionStore` abstractions, not on Postgres or
/// Redis directly, which is also what lets the integration tests run the
/// full HTTP surface against in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    // ---
    repository: RepositoryPtr,
    sessions: SessionStorePtr,
    metrics: MetricsPtr,
    renderer: Arc<Renderer>,
    server: ServerConfig,
    session_cfg: SessionConfig,
    started_at: Instant,
}

impl AppState {
    // ---
    pub fn new(
        repository: RepositoryPtr,
        sessions: SessionStorePtr,
        metrics: MetricsPtr,
        renderer: Arc<Renderer>,
        server: ServerConfig,
        session_cfg: SessionConfig,
    ) -> Self {
        // ---
        AppState {
            repository,
            sessions,
            metrics,
            renderer,
            server,
            session_cfg,
            started_at: Instant::now(),
        }
    }

    pub fn repository(&self) -> &RepositoryPtr {
        // ---
        &self.repository
    }

    pub fn sessions(&self) -> &SessionStorePtr {
        // ---
        &self.sessions
    }

    pub fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    pub fn renderer(&self) -> &Renderer {
        // ---
        &self.renderer
    }

    pub fn instance_name(&self) -> &str {
        // ---
        &self.server.instance_name
    }

    pub fn env_name(&self) -> EnvName {
        // ---
        self.server.env_name
    }

    pub fn base_url(&self) -> &str {
        // ---
        &self.server.base_url
    }

    pub fn session_config(&self) -> &SessionConfig {
        // ---
        &self.session_cfg
    }

    /// Seconds since this process started serving.
    pub fn uptime_secs(&self) -> f64 {
        // ---
        self.started_at.elapsed().as_secs_f64()
    }
}
