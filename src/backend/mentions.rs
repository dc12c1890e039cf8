//! Mention Resolution
//!
//! Runs the rules of `shared::mentions` against the users table. A term
//! resolves to the user whose name equals it (case-insensitive); failing
//! that, to the oldest account whose name contains it. Unmatched terms are
//! dropped.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::{find_users_by_name, User};
use crate::shared::mentions::{extract_mentions, match_user, mention_terms};

/// Candidates fetched per term
const CANDIDATE_LIMIT: i64 = 50;

async fn resolve_term(pool: &SqlitePool, term: &str) -> Result<Option<User>, sqlx::Error> {
    let candidates = find_users_by_name(pool, term, CANDIDATE_LIMIT).await?;
    Ok(match_user(term, &candidates, |u| u.name.as_str()).cloned())
}

async fn resolve_all<I>(pool: &SqlitePool, terms: I) -> Result<Vec<Uuid>, sqlx::Error>
where
    I: IntoIterator<Item = String>,
{
    let mut resolved: Vec<Uuid> = Vec::new();
    for term in terms {
        if let Some(user) = resolve_term(pool, &term).await? {
            if !resolved.contains(&user.id) {
                tracing::debug!("[Mentions] '{}' -> {} ({})", term, user.name, user.id);
                resolved.push(user.id);
            }
        }
    }
    Ok(resolved)
}

/// Resolve explicit `@name` mentions and bare name words in `text`.
///
/// Used for the free-text "chef" and "eaten with" fields of a creation.
pub async fn resolve_mentions(pool: &SqlitePool, text: &str) -> Result<Vec<Uuid>, sqlx::Error> {
    resolve_all(pool, mention_terms(text).into_iter().map(|term| term.text)).await
}

/// Resolve only `@name` mentions, as in comment bodies.
pub async fn resolve_explicit_mentions(pool: &SqlitePool, text: &str) -> Result<Vec<Uuid>, sqlx::Error> {
    resolve_all(pool, extract_mentions(text)).await
}
