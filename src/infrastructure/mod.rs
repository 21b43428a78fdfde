mod database;
pub mod metrics;
mod session;

// Re-export the factory functions for easy access
pub use database::{create_postgres_repository, init_pg_pool};
pub use metrics::{create_noop_metrics, create_prom_metrics};
pub use session::{create_session_store, MemorySessionStore, RedisSessionStore};
