/**
 * Cookbook Handlers
 *
 * # Endpoints
 *
 * - `GET /api/cookbooks` - Owned and invited cookbooks
 * - `POST /api/cookbooks` - Create
 * - `GET /api/cookbooks/{id}` - Populated cookbook
 * - `PATCH /api/cookbooks/{id}` / `DELETE /api/cookbooks/{id}` - Owner only
 * - `POST /api/cookbooks/{id}/recipes` - Reference someone's recipe
 * - `DELETE /api/cookbooks/{id}/recipes/{recipe_id}` - Drop a reference
 * - `POST /api/cookbooks/{id}/invite` - Invite a user (owner only)
 * - `DELETE /api/cookbooks/{id}/invite/{user_id}` - Cancel an invite (owner only)
 *
 * # Access
 *
 * Private cookbooks are visible to the owner and invited users. Invited
 * users may add and remove recipe references; everything else is reserved
 * for the owner.
 */
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{cookbook_view, db, load_cookbook};
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::notifications::{db as notification_db, notify};
use crate::backend::profiles::record_stat;
use crate::backend::recipes::db::{clear_cookbook, get_recipe};
use crate::backend::server::state::AppState;
use crate::shared::models::{
    add_reference, remove_reference, AddRecipeReferenceRequest, Cookbook, CookbookSummary,
    CookbookView, CreateCookbookRequest, InviteRequest, NewNotification, NotificationKind,
    StatChange, UpdateCookbookRequest,
};

fn require_owner(cookbook: &Cookbook, user_id: Uuid) -> Result<(), BackendError> {
    if !cookbook.is_owner(user_id) {
        return Err(BackendError::forbidden("Only the owner can change this cookbook"));
    }
    Ok(())
}

fn require_member(cookbook: &Cookbook, user_id: Uuid) -> Result<(), BackendError> {
    if !cookbook.is_member(user_id) {
        return Err(BackendError::forbidden("You do not have access to this cookbook"));
    }
    Ok(())
}

/// GET /api/cookbooks
pub async fn list_cookbooks(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<CookbookSummary>>, BackendError> {
    let cookbooks = db::list_cookbooks_for_user(&state.db_pool, user.id).await?;
    Ok(Json(cookbooks.iter().map(CookbookSummary::from).collect()))
}

/// POST /api/cookbooks
pub async fn create_cookbook(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CreateCookbookRequest>,
) -> Result<(StatusCode, Json<CookbookView>), BackendError> {
    let cookbook = Cookbook::new(user.id, request)?;
    db::insert_cookbook(&state.db_pool, &cookbook).await?;
    record_stat(&state.db_pool, user.id, StatChange::Cookbooks(1)).await?;

    tracing::info!("Cookbook created: {} by {}", cookbook.id, user.id);
    Ok((StatusCode::CREATED, Json(cookbook_view(&state.db_pool, &cookbook).await?)))
}

/// GET /api/cookbooks/{id}
pub async fn get_cookbook(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CookbookView>, BackendError> {
    let cookbook = load_cookbook(&state.db_pool, id).await?;
    if !cookbook.can_view(user.id) {
        return Err(BackendError::forbidden("This cookbook is private"));
    }
    Ok(Json(cookbook_view(&state.db_pool, &cookbook).await?))
}

/// PATCH /api/cookbooks/{id}
pub async fn update_cookbook(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateCookbookRequest>,
) -> Result<Json<CookbookView>, BackendError> {
    let mut cookbook = load_cookbook(&state.db_pool, id).await?;
    require_owner(&cookbook, user.id)?;

    cookbook.apply_update(request)?;
    db::save_cookbook(&state.db_pool, &cookbook).await?;
    Ok(Json(cookbook_view(&state.db_pool, &cookbook).await?))
}

/// DELETE /api/cookbooks/{id}
///
/// Owned recipes survive with their cookbook reference cleared.
pub async fn delete_cookbook(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let pool = &state.db_pool;
    let cookbook = load_cookbook(pool, id).await?;
    require_owner(&cookbook, user.id)?;

    let detached = clear_cookbook(pool, cookbook.id).await?;
    notification_db::delete_pending_invites(pool, NotificationKind::CookbookInvite, "cookbook_id", cookbook.id, None)
        .await?;
    db::delete_cookbook(pool, cookbook.id).await?;
    record_stat(pool, user.id, StatChange::Cookbooks(-1)).await?;

    tracing::info!("Cookbook deleted: {} ({} recipes detached)", cookbook.id, detached);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/cookbooks/{id}/recipes
pub async fn add_recipe_reference(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<AddRecipeReferenceRequest>,
) -> Result<Json<CookbookView>, BackendError> {
    let pool = &state.db_pool;
    let mut cookbook = load_cookbook(pool, id).await?;
    require_member(&cookbook, user.id)?;

    let recipe_id = request
        .recipe_id
        .ok_or_else(|| BackendError::bad_request("recipe_id is required"))?;
    let recipe = get_recipe(pool, recipe_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Recipe not found"))?;

    if !cookbook.recipes.contains(&recipe.id) && add_reference(&mut cookbook.referenced_recipes, recipe.id) {
        cookbook.updated_at = chrono::Utc::now();
        db::save_cookbook(pool, &cookbook).await?;
    }
    Ok(Json(cookbook_view(pool, &cookbook).await?))
}

/// DELETE /api/cookbooks/{id}/recipes/{recipe_id}
pub async fn remove_recipe_reference(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, recipe_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CookbookView>, BackendError> {
    let pool = &state.db_pool;
    let mut cookbook = load_cookbook(pool, id).await?;
    require_member(&cookbook, user.id)?;

    if remove_reference(&mut cookbook.referenced_recipes, recipe_id) {
        cookbook.updated_at = chrono::Utc::now();
        db::save_cookbook(pool, &cookbook).await?;
    }
    Ok(Json(cookbook_view(pool, &cookbook).await?))
}

/// POST /api/cookbooks/{id}/invite
///
/// # Errors
///
/// * `400 Bad Request` - Missing user, inviting the owner, already invited
/// * `403 Forbidden` - Caller is not the owner
/// * `404 Not Found` - Unknown cookbook or user
pub async fn invite_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<InviteRequest>,
) -> Result<Json<CookbookView>, BackendError> {
    let pool = &state.db_pool;
    let mut cookbook = load_cookbook(pool, id).await?;
    require_owner(&cookbook, user.id)?;

    let invitee_id = request
        .user_id
        .ok_or_else(|| BackendError::bad_request("user_id is required"))?;
    if cookbook.is_owner(invitee_id) {
        return Err(BackendError::bad_request("The owner cannot be invited"));
    }
    let invitee = get_user_by_id(pool, invitee_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    if !add_reference(&mut cookbook.invited_users, invitee.id) {
        return Err(BackendError::bad_request("User is already invited"));
    }

    cookbook.updated_at = chrono::Utc::now();
    db::save_cookbook(pool, &cookbook).await?;
    notify(
        pool,
        &state.realtime_broadcast,
        NewNotification::cookbook_invite(invitee.id, &user.summary(), cookbook.id, &cookbook.name),
    )
    .await?;

    tracing::info!("{} invited {} to cookbook {}", user.id, invitee.id, cookbook.id);
    Ok(Json(cookbook_view(pool, &cookbook).await?))
}

/// DELETE /api/cookbooks/{id}/invite/{user_id}
pub async fn cancel_invite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, invitee_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CookbookView>, BackendError> {
    let pool = &state.db_pool;
    let mut cookbook = load_cookbook(pool, id).await?;
    require_owner(&cookbook, user.id)?;

    if !remove_reference(&mut cookbook.invited_users, invitee_id) {
        return Err(BackendError::not_found("User is not invited"));
    }
    cookbook.updated_at = chrono::Utc::now();
    db::save_cookbook(pool, &cookbook).await?;
    notification_db::delete_pending_invites(
        pool,
        NotificationKind::CookbookInvite,
        "cookbook_id",
        cookbook.id,
        Some(invitee_id),
    )
    .await?;

    Ok(Json(cookbook_view(pool, &cookbook).await?))
}
