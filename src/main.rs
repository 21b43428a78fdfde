// src/main.rs
use anyhow::Result;
use tracing::info;

use account_portal::create_router;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; real environments set variables directly.
    dotenvy::dotenv().ok();

    let app = create_router().await?;

    // Get optional bind endpoint from environment
    let endpoint =
        std::env::var("PORTAL_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8001".to_string());

    info!("Starting at endpoint:{}", endpoint);
    info!(
        "Starting Account Portal server v{}...",
        env!("CARGO_PKG_VERSION")
    );

    let listener = tokio::net::TcpListener::bind(&endpoint).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
