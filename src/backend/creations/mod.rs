//! Creations Backend Module
//!
//! Creations reference recipes and contribute ratings to them. The rating
//! list on each recipe is rewritten whenever a creation's recipe list changes
//! or the creation is deleted; each write touches one recipe at a time.
//!
//! - **`db`** - Queries against the `creations` table
//! - **`handlers`** - `/api/creations` endpoints and comments

pub mod db;
pub mod handlers;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::{get_users_by_ids, User};
use crate::backend::error::BackendError;
use crate::backend::profiles::can_view_profile;
use crate::backend::recipes::db::{get_recipe, get_recipes_by_ids, save_recipe};
use crate::shared::models::{
    Comment, CommentView, Creation, CreationRecipe, CreationRecipeView, CreationView,
    Recipe, RecipeSummary, UserSummary,
};

pub use handlers::{
    add_comment, create_creation, delete_comment, delete_creation, get_creation, list_feed,
    list_user_creations, toggle_yum, update_comment, update_creation,
};

/// Load a creation or fail with 404
pub async fn load_creation(pool: &SqlitePool, id: Uuid) -> Result<Creation, BackendError> {
    db::get_creation(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Creation not found"))
}

/// Append the ratings of `creation` to the recipes it references
pub async fn apply_ratings(pool: &SqlitePool, creation: &Creation) -> Result<(), BackendError> {
    for entry in &creation.recipes {
        let Some(rating) = entry.rating else { continue };
        if let Some(mut recipe) = get_recipe(pool, entry.recipe).await? {
            recipe.add_rating(creation.owner_id, rating, creation.id)?;
            save_recipe(pool, &recipe).await?;
        }
    }
    Ok(())
}

/// Withdraw every rating `creation_id` left on `recipe_ids`
pub async fn withdraw_ratings(pool: &SqlitePool, creation_id: Uuid, recipe_ids: &[Uuid]) -> Result<(), sqlx::Error> {
    for recipe_id in recipe_ids {
        if let Some(mut recipe) = get_recipe(pool, *recipe_id).await? {
            if recipe.remove_ratings_from(creation_id) {
                save_recipe(pool, &recipe).await?;
                tracing::debug!(
                    "Recipe {} average now {:?} after withdrawing {}",
                    recipe.id,
                    recipe.average_rating,
                    creation_id
                );
            }
        }
    }
    Ok(())
}

fn summary_of(users: &[User], id: Uuid) -> Option<UserSummary> {
    users.iter().find(|u| u.id == id).map(User::summary)
}

fn comment_view(users: &[User], comment: &Comment) -> CommentView {
    CommentView {
        id: comment.id,
        user: summary_of(users, comment.user),
        text: comment.text.clone(),
        mentions: comment.mentions.iter().filter_map(|id| summary_of(users, *id)).collect(),
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

fn recipe_entry_view(recipes: &[Recipe], entry: &CreationRecipe) -> CreationRecipeView {
    CreationRecipeView {
        recipe: recipes.iter().find(|r| r.id == entry.recipe).map(RecipeSummary::from),
        recipe_id: entry.recipe,
        rating: entry.rating,
    }
}

/// Populate a creation as seen by `viewer_id`
pub async fn creation_view(pool: &SqlitePool, creation: &Creation, viewer_id: Uuid) -> Result<CreationView, sqlx::Error> {
    let recipes = get_recipes_by_ids(pool, &creation.recipe_ids()).await?;

    let mut user_ids: Vec<Uuid> = vec![creation.owner_id];
    user_ids.extend(creation.chef_id);
    user_ids.extend(creation.eaten_with_users.iter().copied());
    for comment in &creation.comments {
        user_ids.push(comment.user);
        user_ids.extend(comment.mentions.iter().copied());
    }
    user_ids.sort();
    user_ids.dedup();
    let users = get_users_by_ids(pool, &user_ids).await?;

    Ok(CreationView {
        id: creation.id,
        title: creation.title.clone(),
        description: creation.description.clone(),
        image_url: creation.image_url.clone(),
        recipes: creation.recipes.iter().map(|entry| recipe_entry_view(&recipes, entry)).collect(),
        chef_name: creation.chef_name.clone(),
        eaten_with: creation.eaten_with.clone(),
        chef: creation.chef_id.and_then(|id| summary_of(&users, id)),
        eaten_with_users: creation
            .eaten_with_users
            .iter()
            .filter_map(|id| summary_of(&users, *id))
            .collect(),
        likes: creation.likes.len(),
        liked: creation.likes.contains(&viewer_id),
        comments: creation.comments.iter().map(|c| comment_view(&users, c)).collect(),
        owner: summary_of(&users, creation.owner_id),
        created_at: creation.created_at,
        updated_at: creation.updated_at,
    })
}

/// Populate several creations, dropping those whose owner's profile the
/// viewer may not see
pub async fn creation_views(
    pool: &SqlitePool,
    creations: Vec<Creation>,
    viewer_id: Uuid,
) -> Result<Vec<CreationView>, sqlx::Error> {
    let mut owner_ids: Vec<Uuid> = creations.iter().map(|c| c.owner_id).collect();
    owner_ids.sort();
    owner_ids.dedup();
    let owners = get_users_by_ids(pool, &owner_ids).await?;

    let mut views = Vec::with_capacity(creations.len());
    for creation in &creations {
        let visible = owners
            .iter()
            .find(|owner| owner.id == creation.owner_id)
            .map_or(true, |owner| can_view_profile(owner, viewer_id));
        if visible {
            views.push(creation_view(pool, creation, viewer_id).await?);
        }
    }
    Ok(views)
}
