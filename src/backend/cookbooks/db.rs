//! Database operations for cookbooks

use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row, SqlitePool};
use uuid::Uuid;

use crate::backend::db::{json_column, like_pattern, uuid_column};
use crate::shared::models::Cookbook;

impl FromRow<'_, SqliteRow> for Cookbook {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: uuid_column(row, "id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            is_private: row.try_get("is_private")?,
            recipes: json_column(row, "recipes")?,
            referenced_recipes: json_column(row, "referenced_recipes")?,
            owner_id: uuid_column(row, "owner_id")?,
            invited_users: json_column(row, "invited_users")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

pub async fn insert_cookbook(pool: &SqlitePool, cookbook: &Cookbook) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO cookbooks (id, name, description, is_private, recipes, referenced_recipes,
                               owner_id, invited_users, search_text, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(cookbook.id.to_string())
    .bind(&cookbook.name)
    .bind(&cookbook.description)
    .bind(cookbook.is_private)
    .bind(Json(&cookbook.recipes))
    .bind(Json(&cookbook.referenced_recipes))
    .bind(cookbook.owner_id.to_string())
    .bind(Json(&cookbook.invited_users))
    .bind(cookbook.search_text())
    .bind(cookbook.created_at)
    .bind(cookbook.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn save_cookbook(pool: &SqlitePool, cookbook: &Cookbook) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE cookbooks
        SET name = ?2, description = ?3, is_private = ?4, recipes = ?5, referenced_recipes = ?6,
            invited_users = ?7, search_text = ?8, updated_at = ?9
        WHERE id = ?1
        "#,
    )
    .bind(cookbook.id.to_string())
    .bind(&cookbook.name)
    .bind(&cookbook.description)
    .bind(cookbook.is_private)
    .bind(Json(&cookbook.recipes))
    .bind(Json(&cookbook.referenced_recipes))
    .bind(Json(&cookbook.invited_users))
    .bind(cookbook.search_text())
    .bind(cookbook.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_cookbook(pool: &SqlitePool, id: Uuid) -> Result<Option<Cookbook>, sqlx::Error> {
    sqlx::query_as::<_, Cookbook>("SELECT * FROM cookbooks WHERE id = ?1")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
}

/// Cookbooks the user owns or was invited to, newest first
pub async fn list_cookbooks_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Cookbook>, sqlx::Error> {
    sqlx::query_as::<_, Cookbook>(
        r#"
        SELECT * FROM cookbooks
        WHERE owner_id = ?1
           OR EXISTS (SELECT 1 FROM json_each(cookbooks.invited_users) WHERE value = ?1)
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await
}

/// Every cookbook listing `recipe_id` as owned or referenced
pub async fn cookbooks_containing(pool: &SqlitePool, recipe_id: Uuid) -> Result<Vec<Cookbook>, sqlx::Error> {
    sqlx::query_as::<_, Cookbook>(
        r#"
        SELECT * FROM cookbooks
        WHERE EXISTS (SELECT 1 FROM json_each(cookbooks.recipes) WHERE value = ?1)
           OR EXISTS (SELECT 1 FROM json_each(cookbooks.referenced_recipes) WHERE value = ?1)
        "#,
    )
    .bind(recipe_id.to_string())
    .fetch_all(pool)
    .await
}

pub async fn delete_cookbook(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM cookbooks WHERE id = ?1")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

/// Cookbooks matching `term` by name or description that `viewer_id` may see
pub async fn search_cookbooks(
    pool: &SqlitePool,
    term: &str,
    viewer_id: Uuid,
    limit: i64,
) -> Result<Vec<Cookbook>, sqlx::Error> {
    sqlx::query_as::<_, Cookbook>(
        r#"
        SELECT * FROM cookbooks
        WHERE search_text LIKE ?1 ESCAPE '\'
          AND (is_private = FALSE OR owner_id = ?2)
        ORDER BY created_at DESC, rowid DESC
        LIMIT ?3
        "#,
    )
    .bind(like_pattern(term))
    .bind(viewer_id.to_string())
    .bind(limit)
    .fetch_all(pool)
    .await
}
