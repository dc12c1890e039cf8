/**
 * Notification Handlers
 *
 * # Endpoints
 *
 * - `GET /api/notifications` - Caller's notifications, newest first
 * - `GET /api/notifications/unread-count`
 * - `PATCH /api/notifications/{id}/read`
 * - `POST /api/notifications/read-all`
 * - `POST /api/notifications/{id}/respond` - Accept or decline an invite
 * - `DELETE /api/notifications/{id}`
 *
 * Every endpoint only touches notifications addressed to the caller.
 */
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{db, push_unread_count};
use crate::backend::auth::users::{get_user_by_id, get_users_by_ids};
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::server::state::AppState;
use crate::backend::{cookbooks, families, profiles, shopping};
use crate::shared::models::{
    remove_reference, ListNotificationsParams, Notification, NotificationKind,
    NotificationStatus, NotificationView, RespondRequest, UnreadCountResponse,
};

/// Default and maximum page size for the list endpoint
pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

async fn load_own(state: &AppState, id: Uuid, user_id: Uuid) -> Result<Notification, BackendError> {
    let notification = db::get_notification(&state.db_pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Notification not found"))?;
    if notification.recipient_id != user_id {
        return Err(BackendError::forbidden("Not your notification"));
    }
    Ok(notification)
}

async fn with_senders(
    state: &AppState,
    notifications: Vec<Notification>,
) -> Result<Vec<NotificationView>, BackendError> {
    let mut sender_ids: Vec<Uuid> = notifications.iter().filter_map(|n| n.sender_id).collect();
    sender_ids.sort();
    sender_ids.dedup();
    let senders = get_users_by_ids(&state.db_pool, &sender_ids).await?;

    Ok(notifications
        .into_iter()
        .map(|notification| {
            let sender = notification
                .sender_id
                .and_then(|id| senders.iter().find(|u| u.id == id))
                .map(|u| u.summary());
            NotificationView {
                notification,
                sender,
            }
        })
        .collect())
}

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListNotificationsParams>,
) -> Result<Json<Vec<NotificationView>>, BackendError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let unread_only = params.unread.unwrap_or(false);

    let notifications = db::list_notifications(&state.db_pool, user.id, unread_only, limit).await?;
    Ok(Json(with_senders(&state, notifications).await?))
}

/// GET /api/notifications/unread-count
pub async fn get_unread_count(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UnreadCountResponse>, BackendError> {
    let count = db::unread_count(&state.db_pool, user.id).await?;
    Ok(Json(UnreadCountResponse { count }))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, BackendError> {
    let mut notification = load_own(&state, id, user.id).await?;
    if !notification.read {
        db::mark_read(&state.db_pool, id).await?;
        notification.read = true;
        push_unread_count(&state.db_pool, &state.realtime_broadcast, user.id).await?;
    }
    Ok(Json(notification))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UnreadCountResponse>, BackendError> {
    let changed = db::mark_all_read(&state.db_pool, user.id).await?;
    tracing::debug!("Marked {} notifications read for {}", changed, user.id);
    let count = push_unread_count(&state.db_pool, &state.realtime_broadcast, user.id).await?;
    Ok(Json(UnreadCountResponse { count }))
}

/// POST /api/notifications/{id}/respond
///
/// # Errors
///
/// * `400 Bad Request` - Not an invite or follow request, or already answered
/// * `403 Forbidden` - Addressed to someone else
/// * `404 Not Found` - Notification or its target no longer exists
pub async fn respond_to_notification(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<RespondRequest>,
) -> Result<Json<NotificationView>, BackendError> {
    let mut notification = load_own(&state, id, user.id).await?;
    if !notification.kind.needs_response() {
        return Err(BackendError::bad_request("This notification does not take a response"));
    }
    if !notification.is_pending() {
        return Err(BackendError::bad_request("This notification was already answered"));
    }

    let pool = &state.db_pool;
    match (notification.kind, request.accept) {
        (NotificationKind::FollowRequest, true) => {
            let follower_id = notification
                .sender_id
                .ok_or_else(|| BackendError::not_found("Requesting user not found"))?;
            profiles::follow::add_follow(pool, follower_id, user.id).await?;
        }
        (NotificationKind::FamilyInvite, true) => {
            let family_id = notification
                .data_id("family_id")
                .ok_or_else(|| BackendError::not_found("Family not found"))?;
            let mut member = get_user_by_id(pool, user.id)
                .await?
                .ok_or_else(|| BackendError::not_found("User not found"))?;
            families::join_family(pool, &mut member, family_id).await?;
        }
        (NotificationKind::CookbookInvite, false) => {
            if let Some(cookbook_id) = notification.data_id("cookbook_id") {
                if let Some(mut cookbook) = cookbooks::db::get_cookbook(pool, cookbook_id).await? {
                    if remove_reference(&mut cookbook.invited_users, user.id) {
                        cookbooks::db::save_cookbook(pool, &cookbook).await?;
                    }
                }
            }
        }
        (NotificationKind::ShoppingListInvite, false) => {
            if let Some(list_id) = notification.data_id("shopping_list_id") {
                if let Some(mut list) = shopping::db::get_shopping_list(pool, list_id).await? {
                    if remove_reference(&mut list.invited_users, user.id) {
                        shopping::db::save_shopping_list(pool, &list).await?;
                    }
                }
            }
        }
        // Cookbook and shopping list invitees are already on the invited list
        _ => {}
    }

    let status = if request.accept {
        NotificationStatus::Accepted
    } else {
        NotificationStatus::Declined
    };
    db::set_status(pool, id, status).await?;
    notification.status = Some(status);
    notification.read = true;
    push_unread_count(pool, &state.realtime_broadcast, user.id).await?;

    tracing::info!(
        "{} {} notification {}",
        user.id,
        status.as_str(),
        notification.id
    );

    let mut views = with_senders(&state, vec![notification]).await?;
    views
        .pop()
        .map(Json)
        .ok_or_else(|| BackendError::internal("Notification view missing"))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let notification = load_own(&state, id, user.id).await?;
    db::delete_notification(&state.db_pool, id).await?;
    if !notification.read {
        push_unread_count(&state.db_pool, &state.realtime_broadcast, user.id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
