/**
 * Creation Handlers
 *
 * # Endpoints
 *
 * - `GET /api/creations` - Feed of the caller's and followed users' creations
 * - `GET /api/users/{id}/creations` - One user's creations
 * - `POST /api/creations` - Log a creation and rate its recipes
 * - `GET|PATCH|DELETE /api/creations/{id}`
 * - `POST /api/creations/{id}/yum` - Toggle a like
 * - `POST /api/creations/{id}/comments`
 * - `PATCH|DELETE /api/creations/{id}/comments/{comment_id}`
 *
 * # People
 *
 * The free-text `chef` and `eaten_with` fields are resolved to users with the
 * mention resolver unless explicit ids are sent. Every resolved user other
 * than the author gets a `mention` notification the first time they appear.
 *
 * # Privacy
 *
 * Creations of a private user are visible to the user and their followers.
 */
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{apply_ratings, creation_view, creation_views, db, load_creation, withdraw_ratings};
use crate::backend::auth::users::{get_user_by_id, get_users_by_ids, User};
use crate::backend::error::BackendError;
use crate::backend::mentions::{resolve_explicit_mentions, resolve_mentions};
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::notifications::notify;
use crate::backend::profiles::{can_view_profile, record_stat};
use crate::backend::recipes::db::get_recipes_by_ids;
use crate::backend::server::state::AppState;
use crate::shared::error::require_text;
use crate::shared::models::creation::{validate_recipe_inputs, FEED_LIMIT};
use crate::shared::models::{
    Comment, CommentRequest, CreateCreationRequest, Creation, CreationRecipe, CreationView,
    NewNotification, StatChange, UpdateCreationRequest, YumResponse,
};

/// Every referenced recipe must exist
async fn ensure_recipes_exist(pool: &SqlitePool, recipes: &[CreationRecipe]) -> Result<(), BackendError> {
    let ids: Vec<Uuid> = recipes.iter().map(|r| r.recipe).collect();
    let found = get_recipes_by_ids(pool, &ids).await?;
    if let Some(missing) = ids.iter().find(|id| !found.iter().any(|r| r.id == **id)) {
        return Err(BackendError::bad_request(format!("Recipe not found: {}", missing)));
    }
    Ok(())
}

async fn resolve_chef(pool: &SqlitePool, chef_id: Option<Uuid>, chef_name: &str) -> Result<Option<Uuid>, BackendError> {
    if let Some(id) = chef_id {
        let chef = get_user_by_id(pool, id)
            .await?
            .ok_or_else(|| BackendError::bad_request("Unknown chef"))?;
        return Ok(Some(chef.id));
    }
    if chef_name.is_empty() {
        return Ok(None);
    }
    Ok(resolve_mentions(pool, chef_name).await?.into_iter().next())
}

async fn resolve_eaten_with(
    pool: &SqlitePool,
    user_ids: Option<Vec<Uuid>>,
    eaten_with: &str,
) -> Result<Vec<Uuid>, sqlx::Error> {
    match user_ids {
        Some(ids) => {
            let mut resolved: Vec<Uuid> = Vec::new();
            for user in get_users_by_ids(pool, &ids).await? {
                if !resolved.contains(&user.id) {
                    resolved.push(user.id);
                }
            }
            Ok(resolved)
        }
        None if eaten_with.is_empty() => Ok(Vec::new()),
        None => resolve_mentions(pool, eaten_with).await,
    }
}

fn people_of(creation: &Creation) -> Vec<Uuid> {
    let mut people: Vec<Uuid> = Vec::new();
    for id in creation.chef_id.iter().chain(creation.eaten_with_users.iter()) {
        if !people.contains(id) {
            people.push(*id);
        }
    }
    people
}

/// Send `mention` notifications to people newly attached to a creation
async fn notify_people(
    state: &AppState,
    creation: &Creation,
    author: &User,
    already_notified: &[Uuid],
) -> Result<(), sqlx::Error> {
    let context = format!("\"{}\"", creation.title);
    for person in people_of(creation) {
        if person == author.id || already_notified.contains(&person) {
            continue;
        }
        notify(
            &state.db_pool,
            &state.realtime_broadcast,
            NewNotification::mention(person, &author.summary(), creation.id, &context),
        )
        .await?;
    }
    Ok(())
}

/// Load a creation the caller is allowed to see
async fn load_visible(pool: &SqlitePool, id: Uuid, viewer_id: Uuid) -> Result<Creation, BackendError> {
    let creation = load_creation(pool, id).await?;
    if creation.owner_id != viewer_id {
        if let Some(owner) = get_user_by_id(pool, creation.owner_id).await? {
            if !can_view_profile(&owner, viewer_id) {
                return Err(BackendError::forbidden("This profile is private"));
            }
        }
    }
    Ok(creation)
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// GET /api/creations
pub async fn list_feed(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<CreationView>>, BackendError> {
    let mut owners = vec![user.id];
    owners.extend(user.following.iter().copied());

    let creations = db::list_creations_by_owners(&state.db_pool, &owners, FEED_LIMIT).await?;
    Ok(Json(creation_views(&state.db_pool, creations, user.id).await?))
}

/// GET /api/users/{id}/creations
pub async fn list_user_creations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CreationView>>, BackendError> {
    let pool = &state.db_pool;
    let target = get_user_by_id(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    if !can_view_profile(&target, user.id) {
        return Err(BackendError::forbidden("This profile is private"));
    }

    let creations = db::list_creations_by_owners(pool, &[target.id], i64::MAX).await?;
    Ok(Json(creation_views(pool, creations, user.id).await?))
}

/// POST /api/creations
///
/// # Errors
///
/// * `400 Bad Request` - Blank title, no recipes, rating outside 0-5, unknown recipe
pub async fn create_creation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CreateCreationRequest>,
) -> Result<(StatusCode, Json<CreationView>), BackendError> {
    let pool = &state.db_pool;
    let mut creation = Creation::new(user.id, &request.title)?;
    creation.recipes = validate_recipe_inputs(&request.recipes)?;
    ensure_recipes_exist(pool, &creation.recipes).await?;

    creation.description = request.description.unwrap_or_default().trim().to_string();
    creation.image_url = clean_optional(request.image_url);
    creation.chef_name = request.chef.unwrap_or_default().trim().to_string();
    creation.eaten_with = request.eaten_with.unwrap_or_default().trim().to_string();
    creation.chef_id = resolve_chef(pool, request.chef_id, &creation.chef_name).await?;
    creation.eaten_with_users = resolve_eaten_with(pool, request.eaten_with_user_ids, &creation.eaten_with).await?;

    db::insert_creation(pool, &creation).await?;
    apply_ratings(pool, &creation).await?;
    record_stat(pool, user.id, StatChange::Creations(1)).await?;
    notify_people(&state, &creation, &user, &[]).await?;

    tracing::info!("Creation logged: {} by {}", creation.id, user.id);
    Ok((StatusCode::CREATED, Json(creation_view(pool, &creation, user.id).await?)))
}

/// GET /api/creations/{id}
pub async fn get_creation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CreationView>, BackendError> {
    let creation = load_visible(&state.db_pool, id, user.id).await?;
    Ok(Json(creation_view(&state.db_pool, &creation, user.id).await?))
}

/// PATCH /api/creations/{id}
///
/// Sending `recipes` replaces the recipe list: ratings this creation left on
/// the old recipes are withdrawn and the new ones applied.
pub async fn update_creation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateCreationRequest>,
) -> Result<Json<CreationView>, BackendError> {
    let pool = &state.db_pool;
    let mut creation = load_creation(pool, id).await?;
    if !creation.is_owner(user.id) {
        return Err(BackendError::forbidden("Only the owner can change this creation"));
    }
    let previous_people = people_of(&creation);

    if let Some(title) = request.title {
        creation.title = require_text("title", &title)?;
    }
    if let Some(description) = request.description {
        creation.description = description.trim().to_string();
    }
    if request.image_url.is_some() {
        creation.image_url = clean_optional(request.image_url);
    }

    let new_recipes = request
        .recipes
        .as_deref()
        .map(validate_recipe_inputs)
        .transpose()?;
    if let Some(recipes) = &new_recipes {
        ensure_recipes_exist(pool, recipes).await?;
    }

    if request.chef.is_some() || request.chef_id.is_some() {
        if let Some(chef) = request.chef {
            creation.chef_name = chef.trim().to_string();
        }
        creation.chef_id = resolve_chef(pool, request.chef_id, &creation.chef_name).await?;
    }
    if request.eaten_with.is_some() || request.eaten_with_user_ids.is_some() {
        if let Some(eaten_with) = request.eaten_with {
            creation.eaten_with = eaten_with.trim().to_string();
        }
        creation.eaten_with_users =
            resolve_eaten_with(pool, request.eaten_with_user_ids, &creation.eaten_with).await?;
    }

    if let Some(recipes) = new_recipes.clone() {
        withdraw_ratings(pool, creation.id, &creation.recipe_ids()).await?;
        creation.recipes = recipes;
    }
    creation.updated_at = chrono::Utc::now();
    db::save_creation(pool, &creation).await?;
    if new_recipes.is_some() {
        apply_ratings(pool, &creation).await?;
    }
    notify_people(&state, &creation, &user, &previous_people).await?;

    Ok(Json(creation_view(pool, &creation, user.id).await?))
}

/// DELETE /api/creations/{id}
pub async fn delete_creation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    let pool = &state.db_pool;
    let creation = load_creation(pool, id).await?;
    if !creation.is_owner(user.id) {
        return Err(BackendError::forbidden("Only the owner can delete this creation"));
    }

    withdraw_ratings(pool, creation.id, &creation.recipe_ids()).await?;
    db::delete_creation(pool, creation.id).await?;
    record_stat(pool, user.id, StatChange::Creations(-1)).await?;

    let yums = creation.likes.iter().filter(|id| **id != creation.owner_id).count();
    if yums > 0 {
        let yums = i32::try_from(yums).unwrap_or(i32::MAX);
        record_stat(pool, user.id, StatChange::YumsReceived(-yums)).await?;
    }

    tracing::info!("Creation deleted: {}", creation.id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/creations/{id}/yum
pub async fn toggle_yum(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<YumResponse>, BackendError> {
    let pool = &state.db_pool;
    let mut creation = load_visible(pool, id, user.id).await?;

    let liked = creation.toggle_like(user.id);
    db::save_creation(pool, &creation).await?;

    if !creation.is_owner(user.id) {
        if liked {
            record_stat(pool, creation.owner_id, StatChange::YumsReceived(1)).await?;
            notify(
                pool,
                &state.realtime_broadcast,
                NewNotification::yum(creation.owner_id, &user.summary(), creation.id, &creation.title),
            )
            .await?;
        } else {
            record_stat(pool, creation.owner_id, StatChange::YumsReceived(-1)).await?;
        }
    }

    Ok(Json(YumResponse {
        liked,
        likes: creation.likes.len(),
    }))
}

/// Notify users newly mentioned in a comment
async fn notify_comment_mentions(
    state: &AppState,
    creation: &Creation,
    author: &User,
    mentions: &[Uuid],
    skip: &[Uuid],
) -> Result<(), sqlx::Error> {
    for mentioned in mentions {
        if *mentioned == author.id || skip.contains(mentioned) {
            continue;
        }
        notify(
            &state.db_pool,
            &state.realtime_broadcast,
            NewNotification::mention(*mentioned, &author.summary(), creation.id, "a comment"),
        )
        .await?;
    }
    Ok(())
}

/// POST /api/creations/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> Result<(StatusCode, Json<CreationView>), BackendError> {
    let pool = &state.db_pool;
    let mut creation = load_visible(pool, id, user.id).await?;

    let text = require_text("text", &request.text)?;
    let mentions = resolve_explicit_mentions(pool, &text).await?;
    let comment = Comment::new(user.id, &text, mentions.clone())?;
    let comment_id = comment.id;
    creation.comments.push(comment);
    db::save_creation(pool, &creation).await?;

    let mut notified = Vec::new();
    if !creation.is_owner(user.id) {
        notify(
            pool,
            &state.realtime_broadcast,
            NewNotification::comment(creation.owner_id, &user.summary(), creation.id, comment_id, &text),
        )
        .await?;
        notified.push(creation.owner_id);
    }
    notify_comment_mentions(&state, &creation, &user, &mentions, &notified).await?;

    Ok((StatusCode::CREATED, Json(creation_view(pool, &creation, user.id).await?)))
}

/// PATCH /api/creations/{id}/comments/{comment_id}
pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, comment_id)): Path<(Uuid, Uuid)>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> Result<Json<CreationView>, BackendError> {
    let pool = &state.db_pool;
    let mut creation = load_visible(pool, id, user.id).await?;

    let text = require_text("text", &request.text)?;
    let mentions = resolve_explicit_mentions(pool, &text).await?;

    let comment = creation
        .comment_mut(comment_id)
        .ok_or_else(|| BackendError::not_found("Comment not found"))?;
    if comment.user != user.id {
        return Err(BackendError::forbidden("Only the author can edit this comment"));
    }
    let previous_mentions = std::mem::replace(&mut comment.mentions, mentions.clone());
    comment.text = text;
    comment.updated_at = Some(chrono::Utc::now());

    db::save_creation(pool, &creation).await?;
    notify_comment_mentions(&state, &creation, &user, &mentions, &previous_mentions).await?;

    Ok(Json(creation_view(pool, &creation, user.id).await?))
}

/// DELETE /api/creations/{id}/comments/{comment_id}
///
/// Allowed for the comment's author and the creation's owner.
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CreationView>, BackendError> {
    let pool = &state.db_pool;
    let mut creation = load_creation(pool, id).await?;

    let author = creation
        .comments
        .iter()
        .find(|c| c.id == comment_id)
        .map(|c| c.user)
        .ok_or_else(|| BackendError::not_found("Comment not found"))?;
    if author != user.id && !creation.is_owner(user.id) {
        return Err(BackendError::forbidden("Only the author or the creation owner can delete this comment"));
    }

    creation.comments.retain(|c| c.id != comment_id);
    db::save_creation(pool, &creation).await?;
    Ok(Json(creation_view(pool, &creation, user.id).await?))
}
