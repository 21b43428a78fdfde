// Test helpers are intentionally partially used
#![allow(dead_code)]

use account_portal::domain::{
    CredentialRecord, DuplicateField, NewUser, Repository, RepositoryError, Role,
};
use account_portal::render::Renderer;
use account_portal::{
    build_router, create_noop_metrics, AppState, EnvName, MemorySessionStore, ServerConfig,
    SessionConfig,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{redirect, Client, Response};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

// Low bcrypt cost keeps the auth tests fast; production uses cost 12.
pub const TEST_HASH_COST: u32 = 4;

// ============================================================================
// In-memory repository
// ============================================================================

/// Credential store backed by a `Vec` behind a mutex. Mirrors the Postgres
/// repository's behavior closely enough for full HTTP flows: unique
/// username/email enforcement included.
pub struct InMemoryRepository {
    // ---
    records: Mutex<Vec<CredentialRecord>>,
    next_id: AtomicI64,
}

impl InMemoryRepository {
    // ---
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Insert a user directly, hashing the password at test cost.
    pub fn seed_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
        role: Role,
    ) -> i64 {
        // ---
        let hash = bcrypt::hash(password, TEST_HASH_COST).unwrap();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().push(CredentialRecord {
            user_id: id,
            username: username.to_string(),
            password_hash: hash,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            role,
            created_at: Utc::now(),
        });
        id
    }

    pub fn user_count(&self) -> usize {
        // ---
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    // ---
    async fn find_credential_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, RepositoryError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.username == username).cloned())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().any(|r| r.username == username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().any(|r| r.email == email))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<i64, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.username == new_user.username) {
            return Err(RepositoryError::Duplicate(DuplicateField::Username));
        }
        if records.iter().any(|r| r.email == new_user.email) {
            return Err(RepositoryError::Duplicate(DuplicateField::Email));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        records.push(CredentialRecord {
            user_id: id,
            username: new_user.username,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            role: Role::User,
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

// ============================================================================
// Test Setup
// ============================================================================

fn test_server_config() -> ServerConfig {
    // ---
    ServerConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        instance_name: "Portal".to_string(),
        env_name: EnvName::Test,
        base_url: "http://localhost:8001".to_string(),
        templates_dir: "templates".to_string(),
    }
}

fn test_session_config() -> SessionConfig {
    // ---
    SessionConfig {
        redis_url: None,
        cookie_name: "portal_session".to_string(),
        ttl: Duration::from_secs(86_400),
        sweep_interval: Duration::from_secs(900),
        secure_cookie: false,
    }
}

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
    pub repo: Arc<InMemoryRepository>,
}

impl TestServer {
    /// Spin up the full router over in-memory infrastructure: no Postgres,
    /// no Redis, real templates and render pipeline.
    pub async fn new() -> Self {
        // ---
        let repo = Arc::new(InMemoryRepository::new());
        let session_cfg = test_session_config();
        let sessions = Arc::new(MemorySessionStore::new(session_cfg.ttl));
        let metrics = create_noop_metrics().expect("noop metrics");
        let renderer = Arc::new(
            Renderer::new("templates", metrics.clone()).expect("templates should load"),
        );

        let state = AppState::new(
            repo.clone(),
            sessions,
            metrics,
            renderer,
            test_server_config(),
            session_cfg,
        );

        let app = build_router(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(50)).await;

        // Redirects are asserted on directly, so the client must not follow them
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .unwrap();

        Self { addr, client, repo }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }
}

// ============================================================================
// Response helpers
// ============================================================================

/// The `Location` header of a redirect response.
pub fn location(resp: &Response) -> String {
    // ---
    resp.headers()
        .get("location")
        .expect("response should be a redirect")
        .to_str()
        .unwrap()
        .to_string()
}

/// Extracts `name=value` from a `Set-Cookie` header, if the response set one.
pub fn session_cookie_pair(resp: &Response) -> Option<String> {
    // ---
    resp.headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or("").to_string())
}
