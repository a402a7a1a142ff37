//! Budget Sync Server - Main Application Entry Point
//!
//! A REST API server storing one budget per month for a personal budgeting
//! client. It offers CRUD endpoints over the budgets plus a sync endpoint that
//! upserts a whole month at once.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Ensure the `budgets` table exists (fatal on failure)
//! 4. Build HTTP router with routes and middleware
//! 5. Serve on the configured port until Ctrl+C or SIGTERM, then close the pool

mod config;
mod db;
mod error;
mod extract;
mod handlers;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod test_utils;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use services::budget_store::PgBudgetStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .inspect_err(|error| tracing::error!("Failed to connect to database: {error}"))
        .context("Failed to connect to database")?;
    tracing::info!("Database pool created");

    // The server must never run against a missing table
    db::initialize_schema(&pool)
        .await
        .inspect_err(|error| tracing::error!("Failed to initialize database: {error}"))
        .context("Failed to initialize database")?;
    tracing::info!("budgets table is ready");

    let app = routes::build_router(PgBudgetStore::new(pool.clone()));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install SIGTERM handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
