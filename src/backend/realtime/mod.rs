//! Real-time Update Module
//!
//! Pushes notification activity to connected clients over Server-Sent
//! Events.
//!
//! # Architecture
//!
//! - **`broadcast`** - The shared channel and publish helpers
//! - **`subscription`** - SSE handler for `/api/notifications/stream`
//!
//! # Event Types
//!
//! - `notification` - A notification was created for the user
//! - `unread_count` - The user's unread count changed
//!
//! All events travel over one `tokio::sync::broadcast` channel; each
//! subscription drops events addressed to other users.

/// Event broadcasting utilities
pub mod broadcast;

/// Server-Sent Events subscription handler
pub mod subscription;

// Re-export commonly used types and functions
pub use broadcast::{
    broadcast_event, channel, publish_notification, publish_unread_count, RealtimeEventBroadcast,
};
pub use subscription::handle_notification_stream;
