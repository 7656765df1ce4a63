//! Review API HTTP Server Binary
//!
//! This is the main entry point for the review REST API server.
//! It initializes the store, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the in-memory store configured from the environment
//! TABLE_NAME=reviews cargo run --bin review-server
//!
//! # Run with a TOML configuration file
//! REVIEW_API_CONFIG=review-api.toml cargo run --bin review-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REVIEW_API_CONFIG`: Path to a TOML configuration file (optional)
//! - `TABLE_NAME`: Store table name (required without a configuration file)
//! - `MAX_CREATE_ATTEMPTS`: Identifier allocation attempts per create (default: 10)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use review_api::db::{ConfiguredStore, RepositoryFactory};
use review_api::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting review API server");

    let ConfiguredStore { store, config } = match env::var("REVIEW_API_CONFIG") {
        Ok(path) => RepositoryFactory::from_config_file(&path)?,
        Err(_) => RepositoryFactory::from_env()?,
    };
    if !store.health_check().await? {
        anyhow::bail!("store '{}' failed its health check", config.table_name);
    }
    info!(
        "Store '{}' ready (max create attempts: {})",
        config.table_name, config.max_create_attempts
    );

    let state = AppState::from_store(store, &config);
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
