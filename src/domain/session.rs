//! Session records and the pluggable session store seam.
//!
//! A session is either fully authenticated (snapshot present) or absent;
//! there is no partial state. The store owns expiration: `load` applies the
//! rolling refresh, and expired records are reported as absent so callers
//! treat them exactly like an anonymous request.

use super::models::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Server-side session record, keyed by an opaque token held in a cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    // ---
    pub user: AuthenticatedUser,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    // ---
    pub fn is_expired(&self) -> bool {
        // ---
        self.expires_at <= Utc::now()
    }
}

/// Failures from the session backend.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    // ---
    #[error("session backend error: {0}")]
    Backend(String),

    #[error("session payload could not be decoded: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Pluggable persistence for session records.
///
/// Implementations: Redis-backed (persistent) and in-process (fallback).
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    // ---
    /// Create a session for an authenticated user and return its opaque token.
    async fn create(&self, user: AuthenticatedUser) -> Result<String, SessionStoreError>;

    /// Load the record behind a token, extending its expiration (rolling
    /// refresh). Expired or unknown tokens yield `None`.
    async fn load(&self, token: &str) -> Result<Option<SessionRecord>, SessionStoreError>;

    /// Invalidate the store-side record. Callers only clear the client
    /// cookie after this succeeds.
    async fn destroy(&self, token: &str) -> Result<(), SessionStoreError>;
}

/// Type alias for any backend that implements SessionStore.
pub type SessionStorePtr = Arc<dyn SessionStore>;
