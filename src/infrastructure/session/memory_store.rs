//! In-process session store.
//!
//! Fallback for when no persistent backend is reachable. Sessions live in
//! a mutex-guarded map and vanish on restart. A background task sweeps
//! expired records on a fixed interval; `load` also drops expired records
//! eagerly so the sweep interval never extends a session's life.

use crate::domain::{AuthenticatedUser, SessionRecord, SessionStore, SessionStoreError};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

pub struct MemorySessionStore {
    // ---
    ttl: Duration,
    // Plain std mutex: never held across an await point.
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    // ---
    pub fn new(ttl: Duration) -> Self {
        // ---
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Removes expired records, returning how many were dropped.
    pub fn sweep(&self) -> usize {
        // ---
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired());
        before - sessions.len()
    }

    /// Starts the periodic expiration sweep for this store.
    pub fn spawn_sweeper(store: Arc<Self>, interval: Duration) {
        // ---
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let swept = store.sweep();
                if swept > 0 {
                    tracing::debug!("Session sweep removed {swept} expired session(s)");
                }
            }
        });
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    // ---
    async fn create(&self, user: AuthenticatedUser) -> Result<String, SessionStoreError> {
        // ---
        let token = Uuid::new_v4().to_string();
        let record = SessionRecord {
            user,
            expires_at: Utc::now() + self.ttl,
        };

        tracing::info!("Created session for user: {}", record.user.username);

        let mut sessions = self.sessions.lock().expect("session map poisoned");
        sessions.insert(token.clone(), record);

        Ok(token)
    }

    async fn load(&self, token: &str) -> Result<Option<SessionRecord>, SessionStoreError> {
        // ---
        let mut sessions = self.sessions.lock().expect("session map poisoned");

        let Some(record) = sessions.get_mut(token) else {
            return Ok(None);
        };

        if record.is_expired() {
            sessions.remove(token);
            return Ok(None);
        }

        // Rolling refresh.
        record.expires_at = Utc::now() + self.ttl;

        Ok(Some(record.clone()))
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionStoreError> {
        // ---
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        sessions.remove(token);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::domain::Role;
    use chrono::Duration as ChronoDuration;

    fn test_user(name: &str) -> AuthenticatedUser {
        // ---
        AuthenticatedUser {
            id: 1,
            username: name.to_string(),
            display_name: name.to_string(),
            role: Role::User,
            login_time: Utc::now(),
        }
    }

    fn expire_now(store: &MemorySessionStore, token: &str) {
        // ---
        let mut sessions = store.sessions.lock().unwrap();
        let record = sessions.get_mut(token).unwrap();
        record.expires_at = Utc::now() - ChronoDuration::seconds(1);
    }

    #[tokio::test]
    async fn create_then_load_round_trip() {
        // ---
        let store = MemorySessionStore::new(Duration::from_secs(60));

        let token = store.create(test_user("frodo")).await.unwrap();
        let record = store.load(&token).await.unwrap().expect("session present");

        assert_eq!(record.user.username, "frodo");
        assert!(!record.is_expired());
    }

    #[tokio::test]
    async fn load_extends_expiration() {
        // ---
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let token = store.create(test_user("frodo")).await.unwrap();

        let first = store.load(&token).await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = store.load(&token).await.unwrap().unwrap();

        assert!(second.expires_at > first.expires_at);
    }

    #[tokio::test]
    async fn expired_session_reads_as_anonymous() {
        // ---
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let token = store.create(test_user("frodo")).await.unwrap();

        expire_now(&store, &token);

        assert!(store.load(&token).await.unwrap().is_none());
        // And the record is gone, not just hidden.
        assert_eq!(store.sessions.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_sessions() {
        // ---
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let stale = store.create(test_user("stale")).await.unwrap();
        let live = store.create(test_user("live")).await.unwrap();

        expire_now(&store, &stale);

        assert_eq!(store.sweep(), 1);
        assert!(store.load(&stale).await.unwrap().is_none());
        assert!(store.load(&live).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn destroy_removes_the_session() {
        // ---
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let token = store.create(test_user("frodo")).await.unwrap();

        store.destroy(&token).await.unwrap();

        assert!(store.load(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_token_is_anonymous() {
        // ---
        let store = MemorySessionStore::new(Duration::from_secs(60));
        assert!(store.load("no-such-token").await.unwrap().is_none());
    }
}
