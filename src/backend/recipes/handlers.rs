/**
 * Recipe Handlers
 *
 * # Endpoints
 *
 * - `GET /api/recipes?cookbook_id=` - Caller's recipes, newest first
 * - `POST /api/recipes` - Create, optionally inside a cookbook
 * - `GET /api/recipes/{id}` - Recipe with its owner
 * - `PATCH /api/recipes/{id}` - Owner only; may move between cookbooks
 * - `DELETE /api/recipes/{id}` - Owner only
 * - `POST /api/recipes/{id}/copy` - Copy into the caller's collection
 * - `GET /api/recipes/{id}/creations` - Creations that used the recipe
 *
 * A recipe's owning cookbook lists it in `recipes`; moving or deleting the
 * recipe updates those lists one document at a time.
 */
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{can_view_recipe, db, load_recipe, recipe_view};
use crate::backend::cookbooks::db::{cookbooks_containing, get_cookbook, save_cookbook};
use crate::backend::cookbooks::load_cookbook;
use crate::backend::creations::{creation_views, db::list_creations_for_recipe};
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::profiles::record_stat;
use crate::backend::server::state::AppState;
use crate::shared::models::{
    add_reference, remove_reference, Cookbook, CopyRecipeRequest, CreateRecipeRequest, CreationView,
    ListRecipesParams, Recipe, RecipeView, StatChange, UpdateRecipeRequest,
};

/// Check the caller may file recipes into `cookbook_id`
async fn writable_cookbook(
    pool: &SqlitePool,
    cookbook_id: Uuid,
    user_id: Uuid,
) -> Result<Cookbook, BackendError> {
    let cookbook = load_cookbook(pool, cookbook_id).await?;
    if !cookbook.is_member(user_id) {
        return Err(BackendError::forbidden("You do not have access to this cookbook"));
    }
    Ok(cookbook)
}

async fn attach_to_cookbook(pool: &SqlitePool, cookbook_id: Uuid, recipe_id: Uuid) -> Result<(), sqlx::Error> {
    if let Some(mut cookbook) = get_cookbook(pool, cookbook_id).await? {
        if add_reference(&mut cookbook.recipes, recipe_id) {
            cookbook.updated_at = chrono::Utc::now();
            save_cookbook(pool, &cookbook).await?;
        }
    }
    Ok(())
}

async fn detach_from_cookbook(pool: &SqlitePool, cookbook_id: Uuid, recipe_id: Uuid) -> Result<(), sqlx::Error> {
    if let Some(mut cookbook) = get_cookbook(pool, cookbook_id).await? {
        if remove_reference(&mut cookbook.recipes, recipe_id) {
            cookbook.updated_at = chrono::Utc::now();
            save_cookbook(pool, &cookbook).await?;
        }
    }
    Ok(())
}

async fn load_visible(pool: &SqlitePool, id: Uuid, user_id: Uuid) -> Result<Recipe, BackendError> {
    let recipe = load_recipe(pool, id).await?;
    if !can_view_recipe(pool, &recipe, user_id).await? {
        return Err(BackendError::forbidden("This recipe is in a private cookbook"));
    }
    Ok(recipe)
}

fn require_owner(recipe: &Recipe, user_id: Uuid) -> Result<(), BackendError> {
    if recipe.owner_id != user_id {
        return Err(BackendError::forbidden("Only the owner can change this recipe"));
    }
    Ok(())
}

/// GET /api/recipes
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListRecipesParams>,
) -> Result<Json<Vec<Recipe>>, BackendError> {
    let recipes = db::list_recipes_by_owner(&state.db_pool, user.id, params.cookbook_id).await?;
    Ok(Json(recipes))
}

/// POST /api/recipes
///
/// # Errors
///
/// * `400 Bad Request` - Blank title, negative servings or cooking time
/// * `403 Forbidden` - Target cookbook belongs to someone else
/// * `404 Not Found` - Target cookbook does not exist
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeView>), BackendError> {
    let pool = &state.db_pool;
    let recipe = Recipe::new(user.id, request)?;
    if let Some(cookbook_id) = recipe.cookbook_id {
        writable_cookbook(pool, cookbook_id, user.id).await?;
    }

    db::insert_recipe(pool, &recipe).await?;
    if let Some(cookbook_id) = recipe.cookbook_id {
        attach_to_cookbook(pool, cookbook_id, recipe.id).await?;
    }
    record_stat(pool, user.id, StatChange::Recipes(1)).await?;

    tracing::info!("Recipe created: {} by {}", recipe.id, user.id);
    Ok((StatusCode::CREATED, Json(recipe_view(pool, recipe).await?)))
}

/// GET /api/recipes/{id}
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeView>, BackendError> {
    let recipe = load_visible(&state.db_pool, id, user.id).await?;
    Ok(Json(recipe_view(&state.db_pool, recipe).await?))
}

/// PATCH /api/recipes/{id}
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateRecipeRequest>,
) -> Result<Json<RecipeView>, BackendError> {
    let pool = &state.db_pool;
    let mut recipe = load_recipe(pool, id).await?;
    require_owner(&recipe, user.id)?;

    let target = request.cookbook_id.filter(|target| recipe.cookbook_id != Some(*target));
    if let Some(target) = target {
        writable_cookbook(pool, target, user.id).await?;
    }

    recipe.apply_update(request)?;

    if let Some(target) = target {
        if let Some(previous) = recipe.cookbook_id {
            detach_from_cookbook(pool, previous, recipe.id).await?;
        }
        attach_to_cookbook(pool, target, recipe.id).await?;
        tracing::debug!("Recipe {} moved to cookbook {}", recipe.id, target);
        recipe.cookbook_id = Some(target);
    }

    db::save_recipe(pool, &recipe).await?;
    Ok(Json(recipe_view(pool, recipe).await?))
}

/// DELETE /api/recipes/{id}
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let pool = &state.db_pool;
    let recipe = load_recipe(pool, id).await?;
    require_owner(&recipe, user.id)?;

    for mut cookbook in cookbooks_containing(pool, recipe.id).await? {
        let owned = remove_reference(&mut cookbook.recipes, recipe.id);
        let referenced = remove_reference(&mut cookbook.referenced_recipes, recipe.id);
        if owned || referenced {
            cookbook.updated_at = chrono::Utc::now();
            save_cookbook(pool, &cookbook).await?;
        }
    }
    db::delete_recipe(pool, recipe.id).await?;
    record_stat(pool, user.id, StatChange::Recipes(-1)).await?;

    tracing::info!("Recipe deleted: {}", recipe.id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/{id}/copy
pub async fn copy_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<CopyRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeView>), BackendError> {
    let pool = &state.db_pool;
    let source = load_visible(pool, id, user.id).await?;
    if let Some(cookbook_id) = request.cookbook_id {
        writable_cookbook(pool, cookbook_id, user.id).await?;
    }

    let copy = source.copy_for(user.id, request.cookbook_id);
    db::insert_recipe(pool, &copy).await?;
    if let Some(cookbook_id) = copy.cookbook_id {
        attach_to_cookbook(pool, cookbook_id, copy.id).await?;
    }
    record_stat(pool, user.id, StatChange::Recipes(1)).await?;

    tracing::info!("Recipe {} copied to {} by {}", source.id, copy.id, user.id);
    Ok((StatusCode::CREATED, Json(recipe_view(pool, copy).await?)))
}

/// GET /api/recipes/{id}/creations
pub async fn list_recipe_creations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CreationView>>, BackendError> {
    let pool = &state.db_pool;
    let recipe = load_visible(pool, id, user.id).await?;
    let creations = list_creations_for_recipe(pool, recipe.id).await?;
    Ok(Json(creation_views(pool, creations, user.id).await?))
}
