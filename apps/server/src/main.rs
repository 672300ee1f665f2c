//! # Shopbook API Server Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (env-filter, default INFO)
//! 2. Load configuration from environment variables
//! 3. Connect to SQLite & run migrations
//! 4. Serve the REST API

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use shopbook_db::{Database, DbConfig};
use shopbook_server::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Shopbook API server");

    let config = ServerConfig::load()?;
    info!(
        port = config.port,
        db = %config.database_path.display(),
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    let app = shopbook_server::router(db);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initializes tracing with an env filter.
/// Default level is INFO; override with RUST_LOG.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
