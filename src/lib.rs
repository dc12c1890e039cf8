//! Cookshare - Main Library
//!
//! Cookshare is a social recipe-sharing service built with Rust. Users write
//! recipes, collect them into cookbooks and shopping lists, post "creations"
//! (logs of a dish they cooked, with ratings, a photo and the people they
//! cooked with), follow each other and receive notifications for invites,
//! comments, yums and mentions.
//!
//! # Module Structure
//!
//! The library is organized into two main modules:
//!
//! - **`shared`** - Domain types and pure logic
//!   - Document types for every collection (users, recipes, cookbooks, ...)
//!   - Request/response payloads used by the HTTP API
//!   - Mention extraction and name matching
//!   - Real-time event types and shared errors
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server and route configuration
//!   - Session authentication (bcrypt + JWT)
//!   - SQLite document store access via sqlx
//!   - Notification fan-out and Server-Sent Events
//!
//! # Usage
//!
//! ```rust,no_run
//! use cookshare::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let app = create_app(config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```

/// Domain types and pure logic shared by every backend module
pub mod shared;

/// Server-side code (HTTP server, persistence, authentication)
pub mod backend;
