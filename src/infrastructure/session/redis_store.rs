//! Redis-backed session store.
//!
//! Session records are stored as JSON under `session:{token}` with a key
//! TTL. Redis performs the expiration sweep itself; the rolling refresh
//! rewrites the record with a new TTL on every load.

use crate::domain::{AuthenticatedUser, SessionRecord, SessionStore, SessionStoreError};
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use uuid::Uuid;

pub struct RedisSessionStore {
    // ---
    client: Client,
    ttl: Duration,
}

impl RedisSessionStore {
    /// Opens a client and verifies the backend answers before committing
    /// to it as the session store.
    pub async fn connect(url: &str, ttl: Duration) -> Result<Self, SessionStoreError> {
        // ---
        let client = Client::open(url).map_err(backend_err)?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(backend_err)?;
        let _: String = conn.ping().await.map_err(backend_err)?;

        Ok(Self { client, ttl })
    }

    async fn conn(&self) -> Result<MultiplexedConnection, SessionStoreError> {
        // ---
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(backend_err)
    }

    fn key(token: &str) -> String {
        // ---
        format!("session:{token}")
    }
}

fn backend_err(err: redis::RedisError) -> SessionStoreError {
    // ---
    SessionStoreError::Backend(err.to_string())
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    // ---
    async fn create(&self, user: AuthenticatedUser) -> Result<String, SessionStoreError> {
        // ---
        let token = Uuid::new_v4().to_string();
        let record = SessionRecord {
            user,
            expires_at: Utc::now() + self.ttl,
        };

        let payload = serde_json::to_string(&record)?;

        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(Self::key(&token), payload, self.ttl.as_secs())
            .await
            .map_err(backend_err)?;

        tracing::info!("Created session for user: {}", record.user.username);

        Ok(token)
    }

    async fn load(&self, token: &str) -> Result<Option<SessionRecord>, SessionStoreError> {
        // ---
        let key = Self::key(token);
        let mut conn = self.conn().await?;

        let payload: Option<String> = conn.get(&key).await.map_err(backend_err)?;
        let Some(payload) = payload else {
            return Ok(None);
        };

        let mut record: SessionRecord = serde_json::from_str(&payload)?;

        // The key TTL already enforces expiry; this guards against clock
        // drift between writer and reader.
        if record.is_expired() {
            let _: () = conn.del(&key).await.map_err(backend_err)?;
            return Ok(None);
        }

        // Rolling refresh: rewrite with a fresh window so expires_at stays
        // in step with the key TTL.
        record.expires_at = Utc::now() + self.ttl;
        let payload = serde_json::to_string(&record)?;
        conn.set_ex::<_, _, ()>(&key, payload, self.ttl.as_secs())
            .await
            .map_err(backend_err)?;

        Ok(Some(record))
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionStoreError> {
        // ---
        let mut conn = self.conn().await?;
        let _: () = conn.del(Self::key(token)).await.map_err(backend_err)?;

        Ok(())
    }
}
