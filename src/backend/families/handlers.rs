/**
 * Family Handlers
 *
 * # Endpoints
 *
 * - `POST /api/families` - Create a family and join it
 * - `GET /api/families/mine` - The caller's family with members
 * - `POST /api/families/join` - Join with an invite code
 * - `POST /api/families/leave` - Leave; the last member out deletes the family
 * - `POST /api/families/invite` - Invite a user (members only)
 */
use axum::{extract::State, http::StatusCode, Json};

use super::{db, family_view, join_family};
use crate::backend::auth::users::{get_user_by_id, save_user};
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::notifications::notify;
use crate::backend::server::state::AppState;
use crate::shared::models::{
    remove_reference, CreateFamilyRequest, Family, FamilyView, InviteRequest, JoinFamilyRequest,
    NewNotification,
};

/// POST /api/families
pub async fn create_family(
    State(state): State<AppState>,
    AuthUser(mut user): AuthUser,
    ApiJson(request): ApiJson<CreateFamilyRequest>,
) -> Result<(StatusCode, Json<FamilyView>), BackendError> {
    let family = Family::new(user.id, &request.name)?;
    if user.family_id.is_some() {
        return Err(BackendError::bad_request("You already belong to a family"));
    }

    let pool = &state.db_pool;
    db::insert_family(pool, &family).await?;
    user.family_id = Some(family.id);
    save_user(pool, &user).await?;

    tracing::info!("Family created: {} by {}", family.id, user.id);
    Ok((StatusCode::CREATED, Json(family_view(pool, &family).await?)))
}

/// GET /api/families/mine
pub async fn get_my_family(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<FamilyView>, BackendError> {
    let pool = &state.db_pool;
    let family_id = user
        .family_id
        .ok_or_else(|| BackendError::not_found("You do not belong to a family"))?;
    let family = db::get_family(pool, family_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Family not found"))?;
    Ok(Json(family_view(pool, &family).await?))
}

/// POST /api/families/join
pub async fn join_family_by_code(
    State(state): State<AppState>,
    AuthUser(mut user): AuthUser,
    ApiJson(request): ApiJson<JoinFamilyRequest>,
) -> Result<Json<FamilyView>, BackendError> {
    let pool = &state.db_pool;
    let family = db::get_family_by_code(pool, &request.invite_code)
        .await?
        .ok_or_else(|| BackendError::not_found("Invalid invite code"))?;
    let family = join_family(pool, &mut user, family.id).await?;
    Ok(Json(family_view(pool, &family).await?))
}

/// POST /api/families/leave
pub async fn leave_family(
    State(state): State<AppState>,
    AuthUser(mut user): AuthUser,
) -> Result<StatusCode, BackendError> {
    let pool = &state.db_pool;
    let family_id = user
        .family_id
        .ok_or_else(|| BackendError::bad_request("You do not belong to a family"))?;

    if let Some(mut family) = db::get_family(pool, family_id).await? {
        remove_reference(&mut family.members, user.id);
        if family.members.is_empty() {
            db::delete_family(pool, family.id).await?;
            tracing::info!("Family {} deleted after its last member left", family.id);
        } else {
            db::save_family(pool, &family).await?;
        }
    }

    user.family_id = None;
    save_user(pool, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/families/invite
pub async fn invite_to_family(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<InviteRequest>,
) -> Result<Json<FamilyView>, BackendError> {
    let pool = &state.db_pool;
    let family = match user.family_id {
        Some(family_id) => db::get_family(pool, family_id).await?,
        None => None,
    }
    .filter(|family| family.is_member(user.id))
    .ok_or_else(|| BackendError::forbidden("Only family members can invite"))?;

    let invitee_id = request
        .user_id
        .ok_or_else(|| BackendError::bad_request("user_id is required"))?;
    let invitee = get_user_by_id(pool, invitee_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    if family.is_member(invitee.id) {
        return Err(BackendError::bad_request("User is already a member"));
    }

    notify(
        pool,
        &state.realtime_broadcast,
        NewNotification::family_invite(invitee.id, &user.summary(), family.id, &family.name),
    )
    .await?;

    tracing::info!("{} invited {} to family {}", user.id, invitee.id, family.id);
    Ok(Json(family_view(pool, &family).await?))
}
