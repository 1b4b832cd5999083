//! Rehearsal scheduler HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Empty in-memory repository
//! cargo run --bin rehearsal-server
//!
//! # Seeded from a snapshot
//! REPOSITORY_TYPE=snapshot SNAPSHOT_PATH=backend/data/demo_snapshot.json \
//!   cargo run --bin rehearsal-server
//! ```
//!
//! # Environment Variables
//!
//! - `SCHEDULER_CONFIG`: Path of the TOML configuration file
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log filter (default: info)
//! - `REPOSITORY_TYPE`: `local` or `snapshot`
//! - `SNAPSHOT_PATH`: Snapshot file for the `snapshot` repository

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rehearsal_scheduler::config::AppConfig;
use rehearsal_scheduler::db::RepositoryFactory;
use rehearsal_scheduler::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    // `log` records from the library are forwarded by the fmt subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting rehearsal scheduler server");

    let repository = RepositoryFactory::from_settings(&config.repository)
        .context("Failed to initialize repository")?;
    info!(repository = %config.repository.repo_type, "Repository initialized");

    let state = AppState::from_config(repository, &config)?;
    let app = create_router(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
