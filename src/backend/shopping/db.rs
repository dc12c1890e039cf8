//! Database operations for shopping lists

use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row, SqlitePool};
use uuid::Uuid;

use crate::backend::db::{json_column, uuid_column};
use crate::shared::models::ShoppingList;

impl FromRow<'_, SqliteRow> for ShoppingList {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: uuid_column(row, "id")?,
            name: row.try_get("name")?,
            items: json_column(row, "items")?,
            owner_id: uuid_column(row, "owner_id")?,
            invited_users: json_column(row, "invited_users")?,
            recipes_added: json_column(row, "recipes_added")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

pub async fn insert_shopping_list(pool: &SqlitePool, list: &ShoppingList) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO shopping_lists (id, name, items, owner_id, invited_users, recipes_added, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(list.id.to_string())
    .bind(&list.name)
    .bind(Json(&list.items))
    .bind(list.owner_id.to_string())
    .bind(Json(&list.invited_users))
    .bind(Json(&list.recipes_added))
    .bind(list.created_at)
    .bind(list.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn save_shopping_list(pool: &SqlitePool, list: &ShoppingList) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE shopping_lists
        SET name = ?2, items = ?3, invited_users = ?4, recipes_added = ?5, updated_at = ?6
        WHERE id = ?1
        "#,
    )
    .bind(list.id.to_string())
    .bind(&list.name)
    .bind(Json(&list.items))
    .bind(Json(&list.invited_users))
    .bind(Json(&list.recipes_added))
    .bind(list.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_shopping_list(pool: &SqlitePool, id: Uuid) -> Result<Option<ShoppingList>, sqlx::Error> {
    sqlx::query_as::<_, ShoppingList>("SELECT * FROM shopping_lists WHERE id = ?1")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
}

/// Lists the user owns or was invited to, most recently updated first
pub async fn list_shopping_lists_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<ShoppingList>, sqlx::Error> {
    sqlx::query_as::<_, ShoppingList>(
        r#"
        SELECT * FROM shopping_lists
        WHERE owner_id = ?1
           OR EXISTS (SELECT 1 FROM json_each(shopping_lists.invited_users) WHERE value = ?1)
        ORDER BY updated_at DESC, rowid DESC
        "#,
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await
}

pub async fn delete_shopping_list(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM shopping_lists WHERE id = ?1")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}
