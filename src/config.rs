// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the portal.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;
use std::time::Duration;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// # Behavior
/// - Fails fast if the variable is missing
/// - Produces a clear, human-readable error message
/// - Intended for startup-time configuration validation
///
/// Missing configuration is treated as a deployment error,
/// not a recoverable runtime condition.
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

/// Reads an optional environment variable with a string default.
macro_rules! optional_env {
    // ---
    ($key:literal, $default:expr) => {
        std::env::var($key).unwrap_or_else(|_| $default.to_string())
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Deployment environment
// ============================================================

/// Named deployment environment.
///
/// Controls cookie security flags and how much error detail is
/// surfaced to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvName {
    Dev,
    Test,
    Staging,
    Prod,
}

impl EnvName {
    // ---
    pub fn from_env() -> Self {
        // ---
        match std::env::var("PORTAL_ENV").as_deref() {
            Ok("prod") => EnvName::Prod,
            Ok("staging") => EnvName::Staging,
            Ok("test") => EnvName::Test,
            _ => EnvName::Dev,
        }
    }

    pub fn as_str(&self) -> &'static str {
        // ---
        match self {
            EnvName::Dev => "dev",
            EnvName::Test => "test",
            EnvName::Staging => "staging",
            EnvName::Prod => "prod",
        }
    }

    /// Production deployments never echo internal error detail to the client.
    pub fn is_production(&self) -> bool {
        // ---
        matches!(self, EnvName::Prod)
    }
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
/// All required configuration is validated eagerly during initialization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: server::ServerConfig,
    pub database: database::DatabaseConfig,
    pub session: session::SessionConfig,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing or invalid.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        let env_name = EnvName::from_env();

        Ok(Self {
            server: server::ServerConfig::from_env(env_name),
            database: database::DatabaseConfig::from_env()?,
            session: session::SessionConfig::from_env(env_name),
        })
    }
}

// ============================================================
// Server configuration
// ============================================================

mod server {
    // ---
    use super::*;

    /// HTTP server and site identity configuration.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Socket address to bind the listener to. Defaults to 127.0.0.1:8001.
        pub bind_addr: String,

        /// Display name of this portal instance, shown in page titles.
        pub instance_name: String,

        /// Deployment environment name.
        pub env_name: EnvName,

        /// Externally visible base URL, used when views build absolute links.
        pub base_url: String,

        /// Directory scanned for view and layout templates. Defaults to "templates".
        pub templates_dir: String,
    }

    impl ServerConfig {
        // ---
        pub fn from_env(env_name: EnvName) -> Self {
            // ---
            Self {
                bind_addr: optional_env!("PORTAL_BIND_ADDR", "127.0.0.1:8001"),
                instance_name: optional_env!("PORTAL_INSTANCE_NAME", "Portal"),
                env_name,
                base_url: optional_env!("PORTAL_BASE_URL", "http://localhost:8001"),
                templates_dir: optional_env!("PORTAL_TEMPLATES_DIR", "templates"),
            }
        }
    }
}
pub use server::ServerConfig;

// ============================================================
// Database configuration
// ============================================================

mod database {
    // ---
    use super::*;

    /// Database-related configuration derived from environment variables.
    ///
    /// This configuration is required for the service to function and
    /// is validated eagerly during startup.
    #[derive(Debug, Clone)]
    pub struct DatabaseConfig {
        /// PostgreSQL connection string.
        pub database_url: String,

        /// Number of retry attempts when initializing the database connection. Defaults to 50.
        pub retry_count: u32,

        /// Maximum time to wait when acquiring a connection from the pool. Defaults to 30 seconds.
        pub acquire_timeout: Duration,

        /// Minimum number of connections to keep in the pool, even when idle. Defaults to 2.
        pub min_connections: u32,

        /// Maximum number of connections to be open concurrently. Defaults to 15.
        pub max_connections: u32,
    }

    impl DatabaseConfig {
        /// Builds a [`DatabaseConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if required configuration is missing.
        /// Startup will fail fast rather than continuing with incomplete
        /// or invalid configuration.
        pub fn from_env() -> Result<Self> {
            // ---
            let database_url = required_env!("DATABASE_URL");
            let retry_count = optional_env_parse!("PORTAL_DB_RETRY_COUNT", u32, 50);
            let acquire_timeout_secs = optional_env_parse!("PORTAL_DB_ACQUIRE_TIMEOUT_SEC", u64, 30);
            let min_connections = optional_env_parse!("PORTAL_DB_MIN_CONNECTIONS", u32, 2);
            let max_connections = optional_env_parse!("PORTAL_DB_MAX_CONNECTIONS", u32, 15);

            Ok(Self {
                database_url,
                retry_count,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                min_connections,
                max_connections,
            })
        }
    }
}
pub use database::DatabaseConfig;

// ============================================================
// Session configuration
// ============================================================

mod session {
    // ---
    use super::*;

    /// Session store and cookie configuration.
    ///
    /// When `redis_url` is unset the portal falls back to the in-process
    /// session store, which is fine for development but loses sessions on
    /// restart.
    #[derive(Debug, Clone)]
    pub struct SessionConfig {
        /// Redis connection string for the persistent session backend, if any.
        pub redis_url: Option<String>,

        /// Name of the session cookie.
        pub cookie_name: String,

        /// Session time-to-live. Rolling: refreshed on every authenticated request.
        /// Defaults to 24 hours.
        pub ttl: Duration,

        /// How often the in-process store sweeps expired sessions. Defaults to 15 minutes.
        pub sweep_interval: Duration,

        /// Whether the cookie carries the Secure attribute. Tied to deployment env.
        pub secure_cookie: bool,
    }

    impl SessionConfig {
        // ---
        pub fn from_env(env_name: EnvName) -> Self {
            // ---
            let ttl_secs = optional_env_parse!("PORTAL_SESSION_TTL_SEC", u64, 86_400);
            let sweep_secs = optional_env_parse!("PORTAL_SESSION_SWEEP_SEC", u64, 900);

            Self {
                redis_url: std::env::var("PORTAL_REDIS_URL").ok(),
                cookie_name: optional_env!("PORTAL_SESSION_COOKIE", "portal_session"),
                ttl: Duration::from_secs(ttl_secs),
                sweep_interval: Duration::from_secs(sweep_secs),
                secure_cookie: env_name.is_production(),
            }
        }
    }
}
pub use session::SessionConfig;

// ============================================================
// Tests
// ============================================================
