/**
 * Shopping List Handlers
 *
 * # Endpoints
 *
 * - `GET /api/shopping-lists` / `POST /api/shopping-lists`
 * - `GET|PATCH|DELETE /api/shopping-lists/{id}`
 * - `POST /api/shopping-lists/{id}/items`
 * - `PATCH|DELETE /api/shopping-lists/{id}/items/{item_id}`
 * - `POST /api/shopping-lists/{id}/clear-completed`
 * - `POST /api/shopping-lists/{id}/recipes` - Push a recipe's ingredients
 * - `POST /api/shopping-lists/{id}/invite`
 * - `DELETE /api/shopping-lists/{id}/invite/{user_id}`
 *
 * # Access
 *
 * Owner and invited users read the list and edit its items. Renaming,
 * deleting and managing invites is reserved for the owner.
 */
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::db;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::notifications::{db as notification_db, notify};
use crate::backend::recipes::{can_view_recipe, load_recipe};
use crate::backend::server::state::AppState;
use crate::shared::error::require_text;
use crate::shared::models::{
    add_reference, remove_reference, AddItemRequest, AddRecipeToListRequest,
    CreateShoppingListRequest, InviteRequest, NewNotification, NotificationKind, ShoppingItem,
    ShoppingList, UpdateItemRequest, UpdateShoppingListRequest,
};

async fn load_list(pool: &SqlitePool, id: Uuid) -> Result<ShoppingList, BackendError> {
    db::get_shopping_list(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Shopping list not found"))
}

async fn load_as_member(pool: &SqlitePool, id: Uuid, user_id: Uuid) -> Result<ShoppingList, BackendError> {
    let list = load_list(pool, id).await?;
    if !list.is_member(user_id) {
        return Err(BackendError::forbidden("You do not have access to this shopping list"));
    }
    Ok(list)
}

async fn load_as_owner(pool: &SqlitePool, id: Uuid, user_id: Uuid) -> Result<ShoppingList, BackendError> {
    let list = load_list(pool, id).await?;
    if !list.is_owner(user_id) {
        return Err(BackendError::forbidden("Only the owner can change this shopping list"));
    }
    Ok(list)
}

async fn touch_and_save(pool: &SqlitePool, list: &mut ShoppingList) -> Result<(), sqlx::Error> {
    list.updated_at = chrono::Utc::now();
    db::save_shopping_list(pool, list).await
}

/// GET /api/shopping-lists
pub async fn list_shopping_lists(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<ShoppingList>>, BackendError> {
    Ok(Json(db::list_shopping_lists_for_user(&state.db_pool, user.id).await?))
}

/// POST /api/shopping-lists
pub async fn create_shopping_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CreateShoppingListRequest>,
) -> Result<(StatusCode, Json<ShoppingList>), BackendError> {
    let list = ShoppingList::new(user.id, &request.name)?;
    db::insert_shopping_list(&state.db_pool, &list).await?;
    tracing::info!("Shopping list created: {} by {}", list.id, user.id);
    Ok((StatusCode::CREATED, Json(list)))
}

/// GET /api/shopping-lists/{id}
pub async fn get_shopping_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ShoppingList>, BackendError> {
    Ok(Json(load_as_member(&state.db_pool, id, user.id).await?))
}

/// PATCH /api/shopping-lists/{id}
pub async fn update_shopping_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateShoppingListRequest>,
) -> Result<Json<ShoppingList>, BackendError> {
    let pool = &state.db_pool;
    let mut list = load_as_owner(pool, id, user.id).await?;
    if let Some(name) = request.name {
        list.name = require_text("name", &name)?;
    }
    touch_and_save(pool, &mut list).await?;
    Ok(Json(list))
}

/// DELETE /api/shopping-lists/{id}
pub async fn delete_shopping_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let pool = &state.db_pool;
    let list = load_as_owner(pool, id, user.id).await?;
    notification_db::delete_pending_invites(pool, NotificationKind::ShoppingListInvite, "shopping_list_id", list.id, None)
        .await?;
    db::delete_shopping_list(pool, list.id).await?;
    tracing::info!("Shopping list deleted: {}", list.id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/shopping-lists/{id}/items
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<AddItemRequest>,
) -> Result<(StatusCode, Json<ShoppingList>), BackendError> {
    let pool = &state.db_pool;
    let mut list = load_as_member(pool, id, user.id).await?;

    let item = ShoppingItem::new(
        &request.name,
        request.amount.as_deref().unwrap_or_default(),
        request.unit.as_deref().unwrap_or_default(),
        user.id,
    )?;
    list.items.push(item);
    touch_and_save(pool, &mut list).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// PATCH /api/shopping-lists/{id}/items/{item_id}
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    ApiJson(request): ApiJson<UpdateItemRequest>,
) -> Result<Json<ShoppingList>, BackendError> {
    let pool = &state.db_pool;
    let mut list = load_as_member(pool, id, user.id).await?;
    let item = list
        .item_mut(item_id)
        .ok_or_else(|| BackendError::not_found("Item not found"))?;

    if let Some(name) = request.name {
        item.name = require_text("name", &name)?;
    }
    if let Some(amount) = request.amount {
        item.amount = amount.trim().to_string();
    }
    if let Some(unit) = request.unit {
        item.unit = unit.trim().to_string();
    }
    if let Some(completed) = request.completed {
        item.completed = completed;
    }

    touch_and_save(pool, &mut list).await?;
    Ok(Json(list))
}

/// DELETE /api/shopping-lists/{id}/items/{item_id}
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ShoppingList>, BackendError> {
    let pool = &state.db_pool;
    let mut list = load_as_member(pool, id, user.id).await?;
    if !list.remove_item(item_id) {
        return Err(BackendError::not_found("Item not found"));
    }
    touch_and_save(pool, &mut list).await?;
    Ok(Json(list))
}

/// POST /api/shopping-lists/{id}/clear-completed
pub async fn clear_completed(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ShoppingList>, BackendError> {
    let pool = &state.db_pool;
    let mut list = load_as_member(pool, id, user.id).await?;
    let removed = list.clear_completed();
    if removed > 0 {
        touch_and_save(pool, &mut list).await?;
    }
    tracing::debug!("Cleared {} completed items from {}", removed, list.id);
    Ok(Json(list))
}

/// POST /api/shopping-lists/{id}/recipes
pub async fn add_recipe_to_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<AddRecipeToListRequest>,
) -> Result<Json<ShoppingList>, BackendError> {
    let pool = &state.db_pool;
    let mut list = load_as_member(pool, id, user.id).await?;

    let recipe_id = request
        .recipe_id
        .ok_or_else(|| BackendError::bad_request("recipe_id is required"))?;
    let recipe = load_recipe(pool, recipe_id).await?;
    if !can_view_recipe(pool, &recipe, user.id).await? {
        return Err(BackendError::forbidden("This recipe is in a private cookbook"));
    }

    list.add_recipe(recipe.id, &recipe.ingredients, user.id)?;
    db::save_shopping_list(pool, &list).await?;

    tracing::info!("Recipe {} added to shopping list {}", recipe.id, list.id);
    Ok(Json(list))
}

/// POST /api/shopping-lists/{id}/invite
pub async fn invite_to_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<InviteRequest>,
) -> Result<Json<ShoppingList>, BackendError> {
    let pool = &state.db_pool;
    let mut list = load_as_owner(pool, id, user.id).await?;

    let invitee_id = request
        .user_id
        .ok_or_else(|| BackendError::bad_request("user_id is required"))?;
    if list.is_owner(invitee_id) {
        return Err(BackendError::bad_request("The owner cannot be invited"));
    }
    let invitee = get_user_by_id(pool, invitee_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    if !add_reference(&mut list.invited_users, invitee.id) {
        return Err(BackendError::bad_request("User is already invited"));
    }

    touch_and_save(pool, &mut list).await?;
    notify(
        pool,
        &state.realtime_broadcast,
        NewNotification::shopping_list_invite(invitee.id, &user.summary(), list.id, &list.name),
    )
    .await?;

    tracing::info!("{} invited {} to shopping list {}", user.id, invitee.id, list.id);
    Ok(Json(list))
}

/// DELETE /api/shopping-lists/{id}/invite/{user_id}
pub async fn cancel_list_invite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, invitee_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ShoppingList>, BackendError> {
    let pool = &state.db_pool;
    let mut list = load_as_owner(pool, id, user.id).await?;
    if !remove_reference(&mut list.invited_users, invitee_id) {
        return Err(BackendError::not_found("User is not invited"));
    }

    touch_and_save(pool, &mut list).await?;
    notification_db::delete_pending_invites(
        pool,
        NotificationKind::ShoppingListInvite,
        "shopping_list_id",
        list.id,
        Some(invitee_id),
    )
    .await?;
    Ok(Json(list))
}
