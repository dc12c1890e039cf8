/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The SQLite connection pool (the document store)
 * - The loaded server configuration
 * - The broadcast channel for real-time notification events
 *
 * Everything in it is cheap to clone: the pool and the sender are handles,
 * the configuration sits behind an `Arc`.
 *
 * # Example
 *
 * ```rust,no_run
 * use axum::extract::State;
 * use sqlx::SqlitePool;
 *
 * async fn handler(State(pool): State<SqlitePool>) {
 *     // query the store
 * }
 * ```
 */
use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::realtime::broadcast::{self, RealtimeEventBroadcast};
use crate::backend::server::config::ServerConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db_pool: SqlitePool,

    /// Server configuration (JWT secret, session lifetime, bcrypt cost)
    pub config: Arc<ServerConfig>,

    /// Real-time event broadcast channel
    ///
    /// Every notification created or read is published here and forwarded
    /// to the recipient's open notification streams.
    pub realtime_broadcast: RealtimeEventBroadcast,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: ServerConfig) -> Self {
        Self {
            db_pool,
            config: Arc::new(config),
            realtime_broadcast: broadcast::channel(),
        }
    }
}

/// Implement FromRef for SqlitePool
///
/// This allows Axum handlers to extract the pool directly with
/// `State(pool): State<SqlitePool>`.
impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

/// Implement FromRef for the configuration
impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

/// Implement FromRef for RealtimeEventBroadcast
///
/// This allows Axum handlers to extract the real-time event broadcast
/// sender directly from `AppState`.
impl FromRef<AppState> for RealtimeEventBroadcast {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.realtime_broadcast.clone()
    }
}
