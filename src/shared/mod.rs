//! Shared Module
//!
//! This module contains the domain types and pure logic of the application.
//! Nothing in here touches the database or the network, which keeps the
//! rules (rating averages, shopping list merging, trophy thresholds, mention
//! matching) testable in isolation.
//!
//! # Overview
//!
//! - **`models`** - Document types and API payloads for every collection
//! - **`mentions`** - `@name` extraction and the bare-name heuristic
//! - **`event`** - Real-time events pushed to subscribers
//! - **`error`** - Validation and serialization errors

/// Shared error types
pub mod error;

/// Real-time event system
pub mod event;

/// Mention extraction and name matching
pub mod mentions;

/// Document types and request/response payloads
pub mod models;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use event::{EventType, RealtimeEvent};
