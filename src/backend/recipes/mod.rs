//! Recipes Backend Module
//!
//! - **`db`** - Queries against the `recipes` table
//! - **`handlers`** - `/api/recipes` endpoints

pub mod db;
pub mod handlers;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::user_summary;
use crate::backend::cookbooks::db::get_cookbook;
use crate::backend::error::BackendError;
use crate::shared::models::{Recipe, RecipeView};

pub use handlers::{
    copy_recipe, create_recipe, delete_recipe, get_recipe, list_recipe_creations, list_recipes,
    update_recipe,
};

/// Load a recipe or fail with 404
pub async fn load_recipe(pool: &SqlitePool, id: Uuid) -> Result<Recipe, BackendError> {
    db::get_recipe(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Recipe not found"))
}

/// Whether `viewer_id` may read `recipe`.
///
/// A recipe is hidden only when it lives in a private cookbook the viewer is
/// not a member of.
pub async fn can_view_recipe(pool: &SqlitePool, recipe: &Recipe, viewer_id: Uuid) -> Result<bool, sqlx::Error> {
    if recipe.owner_id == viewer_id {
        return Ok(true);
    }
    match recipe.cookbook_id {
        Some(cookbook_id) => Ok(get_cookbook(pool, cookbook_id)
            .await?
            .map_or(true, |cookbook| cookbook.can_view(viewer_id))),
        None => Ok(true),
    }
}

pub async fn recipe_view(pool: &SqlitePool, recipe: Recipe) -> Result<RecipeView, sqlx::Error> {
    let owner = user_summary(pool, recipe.owner_id).await?;
    Ok(RecipeView { recipe, owner })
}
