/**
 * Real-time Event Broadcasting
 *
 * This module provides the broadcast channel every notification change is
 * published on. Events are addressed to one recipient; the subscription
 * handler in `subscription.rs` filters the shared channel per connection.
 *
 * Events are broadcast using `tokio::sync::broadcast`, which provides
 * a multi-producer, multi-consumer channel. All subscribers receive
 * a copy of each event.
 */
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::RealtimeEvent;

/// Capacity of the shared event channel
pub const CHANNEL_CAPACITY: usize = 1000;

/// Real-time update event broadcast
///
/// This type can be cloned and shared across handlers to allow
/// broadcasting events from anywhere in the application.
pub type RealtimeEventBroadcast = broadcast::Sender<RealtimeEvent>;

/// Create the shared channel
pub fn channel() -> RealtimeEventBroadcast {
    let (tx, _) = broadcast::channel::<RealtimeEvent>(CHANNEL_CAPACITY);
    tx
}

/// Broadcast a real-time event to all subscribers
///
/// # Returns
///
/// Number of active subscribers that received the event (0 if no subscribers)
pub fn broadcast_event(broadcast_tx: &RealtimeEventBroadcast, event: RealtimeEvent) -> usize {
    let event_type = event.event_type.as_str();
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!(
                "[Realtime] {} event broadcast to {} subscribers",
                event_type,
                subscriber_count
            );
            subscriber_count
        }
        Err(_) => {
            // No subscribers connected
            tracing::debug!("[Realtime] No subscribers to receive {} event", event_type);
            0
        }
    }
}

/// Publish a notification document to its recipient
pub fn publish_notification(
    broadcast_tx: &RealtimeEventBroadcast,
    recipient_id: Uuid,
    payload: serde_json::Value,
) -> usize {
    broadcast_event(broadcast_tx, RealtimeEvent::notification(recipient_id, payload))
}

/// Publish a recipient's new unread count
pub fn publish_unread_count(
    broadcast_tx: &RealtimeEventBroadcast,
    recipient_id: Uuid,
    count: i64,
) -> usize {
    broadcast_event(broadcast_tx, RealtimeEvent::unread_count(recipient_id, count))
}
