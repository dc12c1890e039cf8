/**
 * Profile Handlers
 *
 * # Endpoints
 *
 * - `GET /api/users/search?q=` - Find users by name or email
 * - `GET /api/users/{id}` - Public profile
 * - `PATCH /api/users/me` - Update the caller's profile
 * - `POST /api/users/{id}/follow` / `DELETE /api/users/{id}/follow`
 * - `DELETE /api/users/{id}/follower` - Drop one of the caller's followers
 * - `GET /api/users/{id}/followers` / `GET /api/users/{id}/following`
 *
 * # Privacy
 *
 * A private profile is shown in full only to its owner and its followers.
 * Everyone else gets name, bio and counts, and cannot list the follow graph.
 */
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::can_view_profile;
use super::follow::{add_follow, remove_follow};
use crate::backend::auth::handlers::UserResponse;
use crate::backend::auth::users::{get_user_by_id, save_user, search_users, user_summaries, User};
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::notifications::{db as notification_db, notify};
use crate::backend::server::state::AppState;
use crate::shared::error::require_text;
use crate::shared::models::search::USER_LIMIT;
use crate::shared::models::{
    FollowResponse, FollowStatus, NewNotification, NotificationKind, PublicProfile,
    UpdateProfileRequest, UserSearchParams, UserSummary,
};

async fn load_user(state: &AppState, id: Uuid) -> Result<User, BackendError> {
    get_user_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))
}

/// Build the profile of `target` as seen by `viewer_id`
pub fn public_profile(target: &User, viewer_id: Uuid) -> PublicProfile {
    let restricted = !can_view_profile(target, viewer_id);
    PublicProfile {
        id: target.id,
        name: target.name.clone(),
        bio: target.bio.clone(),
        is_private: target.is_private,
        followers_count: target.followers.len(),
        following_count: target.following.len(),
        is_following: target.is_followed_by(viewer_id),
        restricted,
        stats: (!restricted).then_some(target.stats),
        trophies: if restricted { Vec::new() } else { target.trophies.clone() },
        created_at: target.created_at,
    }
}

/// GET /api/users/search
pub async fn search_profiles(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(params): Query<UserSearchParams>,
) -> Result<Json<Vec<UserSummary>>, BackendError> {
    let term = params.q.trim();
    if term.is_empty() {
        return Err(BackendError::bad_request("Search query is required"));
    }

    let users = search_users(&state.db_pool, term, USER_LIMIT as i64).await?;
    Ok(Json(users.iter().map(User::summary).collect()))
}

/// GET /api/users/{id}
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicProfile>, BackendError> {
    let target = load_user(&state, id).await?;
    Ok(Json(public_profile(&target, user.id)))
}

/// PATCH /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(mut user): AuthUser,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, BackendError> {
    if let Some(name) = request.name {
        user.name = require_text("name", &name)?;
    }
    if let Some(bio) = request.bio {
        user.bio = bio.trim().to_string();
    }
    if let Some(is_private) = request.is_private {
        user.is_private = is_private;
    }

    save_user(&state.db_pool, &user).await?;
    tracing::info!("Profile updated: {}", user.id);
    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/users/{id}/follow
///
/// Following a private user sends a follow request instead; the edge is only
/// added once the request is accepted.
pub async fn follow_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FollowResponse>, BackendError> {
    if id == user.id {
        return Err(BackendError::bad_request("You cannot follow yourself"));
    }
    let target = load_user(&state, id).await?;
    let pool = &state.db_pool;

    if target.is_followed_by(user.id) {
        return Ok(Json(FollowResponse {
            status: FollowStatus::Following,
        }));
    }

    if target.is_private {
        if !notification_db::has_pending(pool, target.id, user.id, NotificationKind::FollowRequest).await? {
            notify(
                pool,
                &state.realtime_broadcast,
                NewNotification::follow_request(target.id, &user.summary()),
            )
            .await?;
            tracing::info!("{} requested to follow {}", user.id, target.id);
        }
        return Ok(Json(FollowResponse {
            status: FollowStatus::Requested,
        }));
    }

    add_follow(pool, user.id, target.id).await?;
    notify(
        pool,
        &state.realtime_broadcast,
        NewNotification::follow(target.id, &user.summary()),
    )
    .await?;
    tracing::info!("{} followed {}", user.id, target.id);

    Ok(Json(FollowResponse {
        status: FollowStatus::Following,
    }))
}

/// DELETE /api/users/{id}/follow
///
/// Also withdraws a pending follow request.
pub async fn unfollow_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FollowResponse>, BackendError> {
    let target = load_user(&state, id).await?;
    remove_follow(&state.db_pool, user.id, target.id).await?;
    notification_db::delete_pending_invites(
        &state.db_pool,
        NotificationKind::FollowRequest,
        "user_id",
        user.id,
        Some(target.id),
    )
    .await?;

    Ok(Json(FollowResponse {
        status: FollowStatus::NotFollowing,
    }))
}

/// DELETE /api/users/{id}/follower
pub async fn remove_follower(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    load_user(&state, id).await?;
    remove_follow(&state.db_pool, id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/{id}/followers
pub async fn list_followers(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<UserSummary>>, BackendError> {
    let target = load_user(&state, id).await?;
    if !can_view_profile(&target, user.id) {
        return Err(BackendError::forbidden("This profile is private"));
    }
    Ok(Json(user_summaries(&state.db_pool, &target.followers).await?))
}

/// GET /api/users/{id}/following
pub async fn list_following(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<UserSummary>>, BackendError> {
    let target = load_user(&state, id).await?;
    if !can_view_profile(&target, user.id) {
        return Err(BackendError::forbidden("This profile is private"));
    }
    Ok(Json(user_summaries(&state.db_pool, &target.following).await?))
}
