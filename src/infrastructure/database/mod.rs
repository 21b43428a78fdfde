//! PostgreSQL pool initialization and the credential repository.

mod postgres_repository;

pub use postgres_repository::create_postgres_repository;

use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Connects to PostgreSQL with bounded retry and ensures the bootstrap
/// schema exists.
///
/// Retrying covers the common deployment race where the database container
/// comes up after the application. Attempts are spaced half a second apart
/// up to `retry_count`.
pub async fn init_pg_pool(cfg: &DatabaseConfig) -> Result<PgPool> {
    // ---
    let mut attempt: u32 = 0;

    let pool = loop {
        let connect = PgPoolOptions::new()
            .min_connections(cfg.min_connections)
            .max_connections(cfg.max_connections)
            .acquire_timeout(cfg.acquire_timeout)
            .connect(&cfg.database_url)
            .await;

        match connect {
            Ok(pool) => break pool,
            Err(err) if attempt < cfg.retry_count => {
                attempt += 1;
                tracing::warn!(
                    "Database not ready (attempt {attempt}/{}): {err}",
                    cfg.retry_count
                );
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            Err(err) => {
                tracing::error!("Giving up connecting to database: {err}");
                return Err(err.into());
            }
        }
    };

    ensure_schema(&pool).await?;
    tracing::info!("Database pool ready");

    Ok(pool)
}

/// Creates the portal tables when they do not exist yet.
///
/// The unique constraints on `users.email` and `credentials.username` are
/// what the duplicate-entry mapping in the repository relies on.
async fn ensure_schema(pool: &PgPool) -> Result<()> {
    // ---
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
             id         BIGSERIAL PRIMARY KEY,
             first_name TEXT NOT NULL,
             last_name  TEXT NOT NULL,
             email      TEXT NOT NULL UNIQUE,
             created_at TIMESTAMPTZ NOT NULL DEFAULT now()
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS credentials (
             id            BIGSERIAL PRIMARY KEY,
             user_id       BIGINT NOT NULL REFERENCES users(id),
             username      TEXT NOT NULL UNIQUE,
             password_hash TEXT NOT NULL,
             role          TEXT NOT NULL DEFAULT 'user',
             created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
         )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
