//! Follow graph edges
//!
//! An edge is stored twice: in the follower's `following` list and in the
//! followed user's `followers` list. Both sides are written one after the
//! other without a transaction.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::{get_user_by_id, save_user, User};
use crate::backend::error::BackendError;
use crate::shared::models::{add_reference, remove_reference};

async fn load_pair(
    pool: &SqlitePool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<(User, User), BackendError> {
    let follower = get_user_by_id(pool, follower_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    let followed = get_user_by_id(pool, followed_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    Ok((follower, followed))
}

/// Make `follower_id` follow `followed_id`. Returns `false` when already following.
pub async fn add_follow(
    pool: &SqlitePool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<bool, BackendError> {
    let (mut follower, mut followed) = load_pair(pool, follower_id, followed_id).await?;

    let added_following = add_reference(&mut follower.following, followed_id);
    let added_follower = add_reference(&mut followed.followers, follower_id);
    if added_following {
        save_user(pool, &follower).await?;
    }
    if added_follower {
        save_user(pool, &followed).await?;
    }
    Ok(added_following || added_follower)
}

/// Remove the edge `follower_id -> followed_id`. Returns `false` when there was none.
pub async fn remove_follow(
    pool: &SqlitePool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<bool, BackendError> {
    let (mut follower, mut followed) = load_pair(pool, follower_id, followed_id).await?;

    let removed_following = remove_reference(&mut follower.following, followed_id);
    let removed_follower = remove_reference(&mut followed.followers, follower_id);
    if removed_following {
        save_user(pool, &follower).await?;
    }
    if removed_follower {
        save_user(pool, &followed).await?;
    }
    Ok(removed_following || removed_follower)
}
