/**
 * User Model and Database Operations
 *
 * This module handles the stored user document and every query against the
 * `users` table: registration lookups, profile updates, the follow graph,
 * stats, name search and batch lookups used to populate references.
 */
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row, SqlitePool};
use uuid::Uuid;

use crate::backend::db::{json_column, like_pattern, opt_uuid_column, uuid_column};
use crate::shared::models::{Trophy, UserStats, UserSummary};

/// User document as stored
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,
    /// Display name, matched by mentions and search
    pub name: String,
    /// User email address (unique, lower-cased)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Family the user belongs to
    pub family_id: Option<Uuid>,
    pub bio: String,
    pub is_private: bool,
    /// Users following this user
    pub followers: Vec<Uuid>,
    /// Users this user follows
    pub following: Vec<Uuid>,
    pub stats: UserStats,
    pub trophies: Vec<Trophy>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }

    pub fn is_followed_by(&self, user_id: Uuid) -> bool {
        self.followers.contains(&user_id)
    }
}

impl FromRow<'_, SqliteRow> for User {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: uuid_column(row, "id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            family_id: opt_uuid_column(row, "family_id")?,
            bio: row.try_get("bio")?,
            is_private: row.try_get("is_private")?,
            followers: json_column(row, "followers")?,
            following: json_column(row, "following")?,
            stats: json_column(row, "stats")?,
            trophies: json_column(row, "trophies")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Create a new user
pub async fn create_user(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        family_id: None,
        bio: String::new(),
        is_private: false,
        followers: Vec::new(),
        following: Vec::new(),
        stats: UserStats::default(),
        trophies: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO users (id, name, name_lower, email, password_hash, family_id, bio, is_private,
                           followers, following, stats, trophies, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, NULL, '', FALSE, '[]', '[]', ?6, '[]', ?7, ?7)
        "#,
    )
    .bind(user.id.to_string())
    .bind(&user.name)
    .bind(user.name.to_lowercase())
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(Json(&user.stats))
    .bind(now)
    .execute(pool)
    .await?;

    Ok(user)
}

/// Write every mutable field of `user` back to the store
pub async fn save_user(pool: &SqlitePool, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET name = ?2, name_lower = ?3, family_id = ?4, bio = ?5, is_private = ?6, followers = ?7,
            following = ?8, stats = ?9, trophies = ?10, updated_at = ?11
        WHERE id = ?1
        "#,
    )
    .bind(user.id.to_string())
    .bind(&user.name)
    .bind(user.name.to_lowercase())
    .bind(user.family_id.map(|id| id.to_string()))
    .bind(&user.bio)
    .bind(user.is_private)
    .bind(Json(&user.followers))
    .bind(Json(&user.following))
    .bind(Json(&user.stats))
    .bind(Json(&user.trophies))
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Get user by email (case-insensitive)
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?1")
        .bind(email.trim().to_lowercase())
        .fetch_optional(pool)
        .await
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
}

/// Get several users, in the order of `ids`, skipping unknown ids
pub async fn get_users_by_ids(pool: &SqlitePool, ids: &[Uuid]) -> Result<Vec<User>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let wanted: Vec<String> = ids.iter().map(Uuid::to_string).collect();
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE id IN (SELECT value FROM json_each(?1))",
    )
    .bind(Json(&wanted))
    .fetch_all(pool)
    .await?;

    Ok(ids
        .iter()
        .filter_map(|id| users.iter().find(|u| u.id == *id).cloned())
        .collect())
}

/// Populate a list of references into summaries
pub async fn user_summaries(pool: &SqlitePool, ids: &[Uuid]) -> Result<Vec<UserSummary>, sqlx::Error> {
    Ok(get_users_by_ids(pool, ids)
        .await?
        .iter()
        .map(User::summary)
        .collect())
}

/// Populate a single reference
pub async fn user_summary(pool: &SqlitePool, id: Uuid) -> Result<Option<UserSummary>, sqlx::Error> {
    Ok(get_user_by_id(pool, id).await?.map(|u| u.summary()))
}

/// Users whose name or email contains `term`, capped at `limit`
pub async fn search_users(pool: &SqlitePool, term: &str, limit: i64) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users
        WHERE name_lower LIKE ?1 ESCAPE '\' OR email LIKE ?1 ESCAPE '\'
        ORDER BY name_lower, created_at
        LIMIT ?2
        "#,
    )
    .bind(like_pattern(term))
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Users whose name contains `term`: exact (case-insensitive) matches
/// first, then oldest account first
///
/// Used by the mention resolver, which prefers an exact match among these.
pub async fn find_users_by_name(pool: &SqlitePool, term: &str, limit: i64) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users
        WHERE name_lower LIKE ?1 ESCAPE '\'
        ORDER BY name_lower = ?2 DESC, created_at, rowid
        LIMIT ?3
        "#,
    )
    .bind(like_pattern(term))
    .bind(term.trim().to_lowercase())
    .bind(limit)
    .fetch_all(pool)
    .await
}
