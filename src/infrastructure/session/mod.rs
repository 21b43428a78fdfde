//! Session store backends.
//!
//! Selection happens once at startup: when a Redis URL is configured and
//! the server answers a ping, sessions persist there; otherwise the portal
//! degrades to the in-process store with a periodic expiration sweep.

mod memory_store;
mod redis_store;

pub use memory_store::MemorySessionStore;
pub use redis_store::RedisSessionStore;

use crate::config::SessionConfig;
use crate::domain::SessionStorePtr;
use std::sync::Arc;

/// Builds the session store for this process.
///
/// An unreachable Redis backend is a degraded start, not a fatal one; the
/// fallback matches what the reference deployment does when its session
/// backend is absent.
pub async fn create_session_store(cfg: &SessionConfig) -> SessionStorePtr {
    // ---
    if let Some(url) = &cfg.redis_url {
        match RedisSessionStore::connect(url, cfg.ttl).await {
            Ok(store) => {
                tracing::info!("Using Redis session store");
                return Arc::new(store);
            }
            Err(err) => {
                tracing::warn!("Redis session store unavailable ({err}), using in-process store");
            }
        }
    } else {
        tracing::warn!("No PORTAL_REDIS_URL set, using in-process session store");
    }

    let store = Arc::new(MemorySessionStore::new(cfg.ttl));
    MemorySessionStore::spawn_sweeper(store.clone(), cfg.sweep_interval);
    store
}
