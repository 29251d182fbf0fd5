//! # tripdeskd — tripdesk daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`tripdesk.toml`, env vars)
//! - Initialize `tracing` output
//! - Initialize the `SQLite` connection pool and run migrations
//! - Load the reference catalogs
//! - Construct application services, injecting adapters via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use tripdesk_adapter_catalog_json::JsonCatalogs;
use tripdesk_adapter_http_axum::state::AppState;
use tripdesk_adapter_storage_sqlite_sqlx::{self as storage, SqliteServiceRequestRepository};
use tripdesk_app::services::catalog_service::CatalogService;
use tripdesk_app::services::submission_coordinator::SubmissionCoordinator;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = storage::Config {
        database_url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        busy_timeout: Duration::from_millis(config.database.busy_timeout_ms),
    }
    .build()
    .await?;
    tracing::info!(url = %config.database.url, "database ready");

    // Catalogs
    let catalogs = JsonCatalogs::load_dir(&config.catalogs.dir)?;

    // Services
    let submissions = SubmissionCoordinator::new(SqliteServiceRequestRepository::new(
        db.pool().clone(),
    ));
    let catalog_service = CatalogService::new(catalogs);

    // HTTP
    let app = tripdesk_adapter_http_axum::router::build(AppState::new(
        submissions,
        catalog_service,
    ));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("tripdeskd listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.pool().close().await;
    tracing::info!("tripdeskd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
