//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation and layers
//! └── api_routes.rs   - Every /api endpoint
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use cookshare::backend::routes::create_router;
//! use cookshare::backend::server::{AppState, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::builder().database_url("sqlite::memory:").build()?;
//! let pool = cookshare::backend::db::connect_in_memory().await?;
//! let router = create_router(AppState::new(pool, config));
//! # Ok(())
//! # }
//! ```

/// Main router creation
pub mod router;

/// API endpoint registration
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
