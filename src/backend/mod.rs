//! Backend Module
//!
//! This module contains all server-side code for Cookshare. It provides the
//! Axum HTTP server, the SQLite document store, session authentication and
//! the notification fan-out.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`db`** - Connection pool, migrations and column helpers
//! - **`auth`** - Signup, login, session tokens, user documents
//! - **`middleware`** - Request extractors (`AuthUser`, `ApiJson`)
//! - **`realtime`** - Broadcast channel and the SSE notification stream
//! - **`error`** - Backend-specific error types
//!
//! Resource modules, one per collection:
//!
//! - **`profiles`** - Public profiles, follow graph, stats and trophies
//! - **`recipes`**, **`cookbooks`**, **`shopping`** - User content
//! - **`creations`** - Cooking logs with ratings, yums and comments
//! - **`notifications`** - Inbox, read state and invite responses
//! - **`families`** - Invite-code groups
//! - **`mentions`** - Resolving `@name` references to users
//! - **`search`** - Global search across recipes, users and cookbooks
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── db/             - Pool and migrations
//! ├── auth/           - Authentication
//! ├── middleware/     - Extractors
//! ├── realtime/       - Event broadcasting
//! ├── error/          - Error types
//! ├── profiles/       - Profiles and follows
//! ├── recipes/        - Recipes
//! ├── cookbooks/      - Cookbooks
//! ├── shopping/       - Shopping lists
//! ├── creations/      - Creations
//! ├── notifications/  - Notifications
//! ├── families/       - Families
//! ├── mentions.rs     - Mention resolution
//! └── search.rs       - Global search
//! ```
//!
//! # State Management
//!
//! Handlers share an `AppState` holding the `SqlitePool`, the loaded
//! `ServerConfig` and the realtime broadcast sender. Every document is read,
//! changed in memory and written back as a whole row.

/// Server initialization and state
pub mod server;

/// Route configuration
pub mod routes;

/// Connection pool and migrations
pub mod db;

/// Authentication and user documents
pub mod auth;

/// Request extractors
pub mod middleware;

/// Real-time event broadcasting
pub mod realtime;

/// Backend error types
pub mod error;

/// Profiles, follow graph, stats
pub mod profiles;

/// Recipes
pub mod recipes;

/// Cookbooks
pub mod cookbooks;

/// Shopping lists
pub mod shopping;

/// Creations, yums and comments
pub mod creations;

/// Notifications
pub mod notifications;

/// Families
pub mod families;

/// Mention resolution
pub mod mentions;

/// Global search
pub mod search;

// Re-export commonly used types
pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
