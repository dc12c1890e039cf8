//! Database operations for creations

use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row, SqlitePool};
use uuid::Uuid;

use crate::backend::db::{json_column, opt_uuid_column, text_column, uuid_column};
use crate::shared::models::Creation;

impl FromRow<'_, SqliteRow> for Creation {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: uuid_column(row, "id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            image_url: row.try_get("image_url")?,
            recipes: json_column(row, "recipes")?,
            chef_name: text_column(row, "chef_name")?,
            eaten_with: text_column(row, "eaten_with")?,
            chef_id: opt_uuid_column(row, "chef_id")?,
            eaten_with_users: json_column(row, "eaten_with_users")?,
            likes: json_column(row, "likes")?,
            comments: json_column(row, "comments")?,
            owner_id: uuid_column(row, "owner_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

pub async fn insert_creation(pool: &SqlitePool, creation: &Creation) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO creations (id, title, description, image_url, recipes, chef_name, eaten_with, chef_id,
                               eaten_with_users, likes, comments, owner_id, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        "#,
    )
    .bind(creation.id.to_string())
    .bind(&creation.title)
    .bind(&creation.description)
    .bind(&creation.image_url)
    .bind(Json(&creation.recipes))
    .bind(&creation.chef_name)
    .bind(&creation.eaten_with)
    .bind(creation.chef_id.map(|id| id.to_string()))
    .bind(Json(&creation.eaten_with_users))
    .bind(Json(&creation.likes))
    .bind(Json(&creation.comments))
    .bind(creation.owner_id.to_string())
    .bind(creation.created_at)
    .bind(creation.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn save_creation(pool: &SqlitePool, creation: &Creation) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE creations
        SET title = ?2, description = ?3, image_url = ?4, recipes = ?5, chef_name = ?6, eaten_with = ?7,
            chef_id = ?8, eaten_with_users = ?9, likes = ?10, comments = ?11, updated_at = ?12
        WHERE id = ?1
        "#,
    )
    .bind(creation.id.to_string())
    .bind(&creation.title)
    .bind(&creation.description)
    .bind(&creation.image_url)
    .bind(Json(&creation.recipes))
    .bind(&creation.chef_name)
    .bind(&creation.eaten_with)
    .bind(creation.chef_id.map(|id| id.to_string()))
    .bind(Json(&creation.eaten_with_users))
    .bind(Json(&creation.likes))
    .bind(Json(&creation.comments))
    .bind(creation.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_creation(pool: &SqlitePool, id: Uuid) -> Result<Option<Creation>, sqlx::Error> {
    sqlx::query_as::<_, Creation>("SELECT * FROM creations WHERE id = ?1")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
}

pub async fn delete_creation(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM creations WHERE id = ?1")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

/// Creations by any of `owner_ids`, newest first
pub async fn list_creations_by_owners(
    pool: &SqlitePool,
    owner_ids: &[Uuid],
    limit: i64,
) -> Result<Vec<Creation>, sqlx::Error> {
    let owners: Vec<String> = owner_ids.iter().map(Uuid::to_string).collect();
    sqlx::query_as::<_, Creation>(
        r#"
        SELECT * FROM creations
        WHERE owner_id IN (SELECT value FROM json_each(?1))
        ORDER BY created_at DESC, rowid DESC
        LIMIT ?2
        "#,
    )
    .bind(Json(&owners))
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Creations that used `recipe_id`, newest first
pub async fn list_creations_for_recipe(pool: &SqlitePool, recipe_id: Uuid) -> Result<Vec<Creation>, sqlx::Error> {
    sqlx::query_as::<_, Creation>(
        r#"
        SELECT * FROM creations
        WHERE EXISTS (
            SELECT 1 FROM json_each(creations.recipes)
            WHERE json_extract(value, '$.recipe') = ?1
        )
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(recipe_id.to_string())
    .fetch_all(pool)
    .await
}
