//! Global Search
//!
//! `GET /api/search?q=` looks the term up in recipes, users and cookbooks at
//! once. Matching is a case-insensitive substring test; results keep the
//! store's newest-first order and are not ranked.

use axum::{
    extract::{Query, State},
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::{search_users, User};
use crate::backend::cookbooks::db::search_cookbooks;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::recipes::db::search_visible_recipes;
use crate::backend::server::state::AppState;
use crate::shared::models::search::{COOKBOOK_LIMIT, RECIPE_LIMIT, USER_LIMIT};
use crate::shared::models::{CookbookSummary, RecipeSummary, SearchParams, SearchResponse, UserSummary};

/// Recipes matching `term` that `viewer_id` may see
async fn visible_recipes(pool: &SqlitePool, term: &str, viewer_id: Uuid) -> Result<Vec<RecipeSummary>, sqlx::Error> {
    Ok(search_visible_recipes(pool, term, viewer_id, RECIPE_LIMIT as i64)
        .await?
        .iter()
        .filter(|recipe| recipe.matches(term))
        .map(RecipeSummary::from)
        .collect())
}

async fn matching_users(pool: &SqlitePool, term: &str) -> Result<Vec<UserSummary>, sqlx::Error> {
    Ok(search_users(pool, term, USER_LIMIT as i64)
        .await?
        .iter()
        .map(User::summary)
        .collect())
}

async fn matching_cookbooks(pool: &SqlitePool, term: &str, viewer_id: Uuid) -> Result<Vec<CookbookSummary>, sqlx::Error> {
    Ok(search_cookbooks(pool, term, viewer_id, COOKBOOK_LIMIT as i64)
        .await?
        .iter()
        .map(CookbookSummary::from)
        .collect())
}

/// GET /api/search
pub async fn search(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, BackendError> {
    let term = params.q.trim();
    if term.is_empty() {
        return Err(BackendError::bad_request("Search query is required"));
    }

    let pool = &state.db_pool;
    let (recipes, users, cookbooks) = tokio::try_join!(
        visible_recipes(pool, term, user.id),
        matching_users(pool, term),
        matching_cookbooks(pool, term, user.id),
    )?;

    tracing::debug!(
        "Search '{}': {} recipes, {} users, {} cookbooks",
        term,
        recipes.len(),
        users.len(),
        cookbooks.len()
    );
    Ok(Json(SearchResponse {
        recipes,
        users,
        cookbooks,
    }))
}
