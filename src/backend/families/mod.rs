//! Families Backend Module
//!
//! A user belongs to at most one family. Membership is written on both the
//! family document (`members`) and the user (`family_id`).
//!
//! - **`db`** - Queries against the `families` table
//! - **`handlers`** - `/api/families` endpoints

pub mod db;
pub mod handlers;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::{save_user, user_summaries, User};
use crate::backend::error::BackendError;
use crate::shared::models::{add_reference, Family, FamilyView};

pub use handlers::{create_family, get_my_family, invite_to_family, join_family_by_code, leave_family};

/// Add `user` to the family `family_id`
///
/// # Errors
///
/// * `400 Bad Request` - The user already belongs to a family
/// * `404 Not Found` - The family no longer exists
pub async fn join_family(pool: &SqlitePool, user: &mut User, family_id: Uuid) -> Result<Family, BackendError> {
    if user.family_id.is_some() {
        return Err(BackendError::bad_request("You already belong to a family"));
    }
    let mut family = db::get_family(pool, family_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Family not found"))?;

    if add_reference(&mut family.members, user.id) {
        db::save_family(pool, &family).await?;
    }
    user.family_id = Some(family.id);
    save_user(pool, user).await?;

    tracing::info!("{} joined family {}", user.id, family.id);
    Ok(family)
}

pub async fn family_view(pool: &SqlitePool, family: &Family) -> Result<FamilyView, sqlx::Error> {
    Ok(FamilyView {
        id: family.id,
        name: family.name.clone(),
        invite_code: family.invite_code.clone(),
        members: user_summaries(pool, &family.members).await?,
        created_by: family.created_by,
        created_at: family.created_at,
    })
}
