//! Database operations for notifications

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row, SqlitePool};
use uuid::Uuid;

use crate::backend::db::{json_column, opt_uuid_column, uuid_column};
use crate::shared::models::{
    NewNotification, Notification, NotificationKind, NotificationStatus,
};

impl FromRow<'_, SqliteRow> for Notification {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("kind")?;
        let status: Option<String> = row.try_get("status")?;
        Ok(Self {
            id: uuid_column(row, "id")?,
            recipient_id: uuid_column(row, "recipient_id")?,
            sender_id: opt_uuid_column(row, "sender_id")?,
            kind: NotificationKind::from_str(&kind).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: format!("unknown notification kind '{}'", kind).into(),
            })?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            data: json_column(row, "data")?,
            read: row.try_get("read")?,
            status: status.as_deref().and_then(NotificationStatus::from_str),
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Insert a notification
pub async fn insert_notification(
    pool: &SqlitePool,
    new: &NewNotification,
) -> Result<Notification, sqlx::Error> {
    let notification = Notification {
        id: Uuid::new_v4(),
        recipient_id: new.recipient_id,
        sender_id: new.sender_id,
        kind: new.kind,
        title: new.title.clone(),
        message: new.message.clone(),
        data: new.data.clone(),
        read: false,
        status: new.initial_status(),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO notifications (id, recipient_id, sender_id, kind, title, message, data, read, status, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, FALSE, ?8, ?9)
        "#,
    )
    .bind(notification.id.to_string())
    .bind(notification.recipient_id.to_string())
    .bind(notification.sender_id.map(|id| id.to_string()))
    .bind(notification.kind.as_str())
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(Json(&notification.data))
    .bind(notification.status.map(|s| s.as_str()))
    .bind(notification.created_at)
    .execute(pool)
    .await?;

    Ok(notification)
}

/// A recipient's notifications, newest first
pub async fn list_notifications(
    pool: &SqlitePool,
    recipient_id: Uuid,
    unread_only: bool,
    limit: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        r#"
        SELECT * FROM notifications
        WHERE recipient_id = ?1 AND (?2 = FALSE OR read = FALSE)
        ORDER BY created_at DESC, rowid DESC
        LIMIT ?3
        "#,
    )
    .bind(recipient_id.to_string())
    .bind(unread_only)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn get_notification(pool: &SqlitePool, id: Uuid) -> Result<Option<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = ?1")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
}

pub async fn unread_count(pool: &SqlitePool, recipient_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE recipient_id = ?1 AND read = FALSE")
        .bind(recipient_id.to_string())
        .fetch_one(pool)
        .await
}

pub async fn mark_read(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE notifications SET read = TRUE WHERE id = ?1")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

/// Mark every notification of a recipient read, returning how many changed
pub async fn mark_all_read(pool: &SqlitePool, recipient_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE recipient_id = ?1 AND read = FALSE")
        .bind(recipient_id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Record the answer to an invite or follow request; answering also reads it
pub async fn set_status(
    pool: &SqlitePool,
    id: Uuid,
    status: NotificationStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE notifications SET status = ?2, read = TRUE WHERE id = ?1")
        .bind(id.to_string())
        .bind(status.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_notification(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM notifications WHERE id = ?1")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

/// Whether `sender` already has a pending notification of `kind` for `recipient`
pub async fn has_pending(
    pool: &SqlitePool,
    recipient_id: Uuid,
    sender_id: Uuid,
    kind: NotificationKind,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM notifications
        WHERE recipient_id = ?1 AND sender_id = ?2 AND kind = ?3 AND status = 'pending'
        "#,
    )
    .bind(recipient_id.to_string())
    .bind(sender_id.to_string())
    .bind(kind.as_str())
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Delete pending invites of `kind` whose data field `key` points at `target_id`.
///
/// With `recipient_id` set only that user's invites are removed.
pub async fn delete_pending_invites(
    pool: &SqlitePool,
    kind: NotificationKind,
    key: &str,
    target_id: Uuid,
    recipient_id: Option<Uuid>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM notifications
        WHERE kind = ?1 AND status = 'pending'
          AND json_extract(data, ?2) = ?3
          AND (?4 IS NULL OR recipient_id = ?4)
        "#,
    )
    .bind(kind.as_str())
    .bind(format!("$.{}", key))
    .bind(target_id.to_string())
    .bind(recipient_id.map(|id| id.to_string()))
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
