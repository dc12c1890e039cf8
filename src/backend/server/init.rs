/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including database setup, state creation and route configuration.
 *
 * # Initialization Process
 *
 * 1. Make sure the directory of a file-backed database exists
 * 2. Open the SQLite pool
 * 3. Run migrations
 * 4. Create `AppState` and the router
 */
use std::path::Path;

use axum::Router;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::backend::db;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Errors that stop the server from starting
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Create and configure the Axum application
///
/// Unlike optional integrations, the database is required: every route reads
/// or writes it, so any failure here aborts startup.
pub async fn create_app(config: ServerConfig) -> Result<Router, InitError> {
    tracing::info!("Initializing cookshare backend server");

    ensure_database_dir(&config.database_url)?;

    tracing::info!("Connecting to database...");
    let pool = db::connect(&config.database_url).await?;
    tracing::info!("Database connection pool created successfully");

    Ok(create_app_with_pool(pool, config).await?)
}

/// Build the application around an existing pool (used by tests)
pub async fn create_app_with_pool(
    pool: SqlitePool,
    config: ServerConfig,
) -> Result<Router, sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    let app_state = AppState::new(pool, config);
    let app = create_router(app_state);

    tracing::info!("Router configured");
    Ok(app)
}

/// Create the parent directory of a `sqlite://path` database
fn ensure_database_dir(database_url: &str) -> Result<(), std::io::Error> {
    let Some(path) = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tracing::info!("Creating database directory {}", parent.display());
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
