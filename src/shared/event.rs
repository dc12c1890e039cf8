/**
 * Real-time Event System
 *
 * This module defines the events pushed to connected clients over the
 * notification stream. Every event is addressed to exactly one recipient;
 * the subscription handler drops events addressed to anyone else.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of real-time event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A notification was created for the recipient
    Notification,
    /// The recipient's unread notification count changed
    UnreadCount,
}

impl EventType {
    /// SSE event name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Notification => "notification",
            EventType::UnreadCount => "unread_count",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "notification" => Some(EventType::Notification),
            "unread_count" => Some(EventType::UnreadCount),
            _ => None,
        }
    }
}

/// Real-time event addressed to one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeEvent {
    /// Type of event
    pub event_type: EventType,
    /// User the event is meant for
    pub recipient_id: Uuid,
    /// Event payload (JSON-serializable data)
    pub payload: serde_json::Value,
    /// Timestamp when event occurred
    pub timestamp: String,
}

impl RealtimeEvent {
    /// Create a new real-time event
    pub fn new(event_type: EventType, recipient_id: Uuid, payload: serde_json::Value) -> Self {
        Self {
            event_type,
            recipient_id,
            payload,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a notification event
    pub fn notification(recipient_id: Uuid, payload: serde_json::Value) -> Self {
        Self::new(EventType::Notification, recipient_id, payload)
    }

    /// Create an unread-count event
    pub fn unread_count(recipient_id: Uuid, count: i64) -> Self {
        Self::new(
            EventType::UnreadCount,
            recipient_id,
            serde_json::json!({ "count": count }),
        )
    }

    /// Whether this event should be delivered to `user_id`
    pub fn is_for(&self, user_id: Uuid) -> bool {
        self.recipient_id == user_id
    }
}
