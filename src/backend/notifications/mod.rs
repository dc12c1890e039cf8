//! Notifications Backend Module
//!
//! Notifications are written synchronously by the mutation that causes them
//! and then pushed to the recipient's realtime stream together with the new
//! unread count. Delivery is best effort: a recipient with no open stream
//! simply picks the notification up on the next list call.
//!
//! - **`db`** - Queries against the `notifications` table
//! - **`handlers`** - List, read, respond and delete endpoints

pub mod db;
pub mod handlers;

use sqlx::SqlitePool;

use crate::backend::realtime::{publish_notification, publish_unread_count, RealtimeEventBroadcast};
use crate::shared::models::{NewNotification, Notification};

pub use handlers::{
    delete_notification, get_unread_count, list_notifications, mark_all_read, mark_read,
    respond_to_notification,
};

/// Store a notification and push it to the recipient
pub async fn notify(
    pool: &SqlitePool,
    broadcast_tx: &RealtimeEventBroadcast,
    new: NewNotification,
) -> Result<Notification, sqlx::Error> {
    let notification = db::insert_notification(pool, &new).await?;
    tracing::debug!(
        "[Notify] {} -> {} ({})",
        notification.kind.as_str(),
        notification.recipient_id,
        notification.id
    );

    match serde_json::to_value(&notification) {
        Ok(payload) => {
            publish_notification(broadcast_tx, notification.recipient_id, payload);
        }
        Err(e) => tracing::warn!("[Notify] Could not encode notification {}: {}", notification.id, e),
    }
    push_unread_count(pool, broadcast_tx, notification.recipient_id).await?;

    Ok(notification)
}

/// Push the current unread count of `recipient_id`
pub async fn push_unread_count(
    pool: &SqlitePool,
    broadcast_tx: &RealtimeEventBroadcast,
    recipient_id: uuid::Uuid,
) -> Result<i64, sqlx::Error> {
    let count = db::unread_count(pool, recipient_id).await?;
    publish_unread_count(broadcast_tx, recipient_id, count);
    Ok(count)
}
