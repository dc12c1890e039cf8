//! Stats counters and trophy awards

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::{get_user_by_id, save_user};
use crate::shared::models::{StatChange, Trophy};

/// Apply `change` to a user's counters and award any trophy now earned.
///
/// Returns the newly awarded trophies. Trophies are never taken away when a
/// counter goes back down. Unknown users are ignored.
pub async fn record_stat(
    pool: &SqlitePool,
    user_id: Uuid,
    change: StatChange,
) -> Result<Vec<Trophy>, sqlx::Error> {
    let Some(mut user) = get_user_by_id(pool, user_id).await? else {
        tracing::warn!("[Stats] Skipping {:?} for unknown user {}", change, user_id);
        return Ok(Vec::new());
    };

    user.stats.apply(change);
    let awarded = Trophy::newly_earned(&user.stats, &user.trophies);
    user.trophies.extend(awarded.iter().copied());
    save_user(pool, &user).await?;

    for trophy in &awarded {
        tracing::info!("[Stats] {} earned trophy '{}'", user_id, trophy.title());
    }
    Ok(awarded)
}
