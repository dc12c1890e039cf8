//! Cookbooks Backend Module
//!
//! - **`db`** - Queries against the `cookbooks` table
//! - **`handlers`** - `/api/cookbooks` endpoints
//!
//! Owned recipes point back at their cookbook through `cookbook_id`;
//! referenced recipes stay owned by someone else and are only listed here.

pub mod db;
pub mod handlers;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::{user_summaries, user_summary};
use crate::backend::error::BackendError;
use crate::backend::recipes::db::get_recipes_by_ids;
use crate::shared::models::{Cookbook, CookbookView, RecipeSummary};

pub use handlers::{
    add_recipe_reference, cancel_invite, create_cookbook, delete_cookbook, get_cookbook,
    invite_user, list_cookbooks, remove_recipe_reference, update_cookbook,
};

/// Load a cookbook or fail with 404
pub async fn load_cookbook(pool: &SqlitePool, id: Uuid) -> Result<Cookbook, BackendError> {
    db::get_cookbook(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Cookbook not found"))
}

/// Resolve every reference of a cookbook
pub async fn cookbook_view(pool: &SqlitePool, cookbook: &Cookbook) -> Result<CookbookView, sqlx::Error> {
    let recipes = get_recipes_by_ids(pool, &cookbook.recipes).await?;
    let referenced = get_recipes_by_ids(pool, &cookbook.referenced_recipes).await?;

    Ok(CookbookView {
        id: cookbook.id,
        name: cookbook.name.clone(),
        description: cookbook.description.clone(),
        is_private: cookbook.is_private,
        recipes: recipes.iter().map(RecipeSummary::from).collect(),
        referenced_recipes: referenced.iter().map(RecipeSummary::from).collect(),
        owner: user_summary(pool, cookbook.owner_id).await?,
        invited_users: user_summaries(pool, &cookbook.invited_users).await?,
        created_at: cookbook.created_at,
        updated_at: cookbook.updated_at,
    })
}
