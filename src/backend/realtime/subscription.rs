/**
 * Notification Stream Handler
 *
 * This module implements the Server-Sent Events handler for
 * `GET /api/notifications/stream`. Each connection receives only the events
 * addressed to the authenticated user.
 *
 * # Event Filtering
 *
 * Clients can filter events by type using the `types` query parameter:
 * - `?types=notification` - Only new notifications
 * - `?types=unread_count` - Only unread count changes
 * - No parameter - All event types
 *
 * # Connection Management
 *
 * - Connections are kept alive using the SSE keep-alive mechanism
 * - Lagged events are logged but don't cause connection drops
 */
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, Stream};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::backend::middleware::AuthUser;
use crate::backend::realtime::broadcast::RealtimeEventBroadcast;
use crate::shared::{EventType, RealtimeEvent};

/// Query parameters for the stream
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StreamParams {
    /// Comma-separated event types
    pub types: Option<String>,
}

/// Parse the `types` filter; `None` means every type.
pub fn parse_type_filter(types: Option<&str>) -> Option<Vec<EventType>> {
    types
        .map(|raw| raw.split(',').filter_map(EventType::from_str).collect::<Vec<_>>())
        .filter(|types| !types.is_empty())
}

/// Whether `event` should be sent to `user_id` under `filter`
pub fn should_deliver(event: &RealtimeEvent, user_id: Uuid, filter: Option<&[EventType]>) -> bool {
    event.is_for(user_id) && filter.map_or(true, |types| types.contains(&event.event_type))
}

/// Handle notification subscription (GET /api/notifications/stream)
pub async fn handle_notification_stream(
    AuthUser(user): AuthUser,
    State(broadcast_tx): State<RealtimeEventBroadcast>,
    Query(params): Query<StreamParams>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let filter = parse_type_filter(params.types.as_deref());
    tracing::info!(
        "[Realtime] {} subscribed to notifications (filter: {:?})",
        user.id,
        filter
    );

    let user_id = user.id;
    let broadcast_rx = broadcast_tx.subscribe();

    let stream = stream::unfold((broadcast_rx, filter), move |(mut rx, filter)| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if !should_deliver(&event, user_id, filter.as_deref()) {
                        continue;
                    }

                    let event_data = match serde_json::to_string(&event) {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
                            continue;
                        }
                    };

                    let sse_event = Event::default()
                        .event(event.event_type.as_str())
                        .data(event_data);

                    return Some((Ok(sse_event), (rx, filter)));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] Receiver lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => {
                    tracing::warn!("[Realtime] Broadcast channel closed, ending stream");
                    return None;
                }
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
