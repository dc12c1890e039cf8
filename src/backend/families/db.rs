//! Database operations for families

use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row, SqlitePool};
use uuid::Uuid;

use crate::backend::db::{json_column, uuid_column};
use crate::shared::models::family::normalize_invite_code;
use crate::shared::models::Family;

impl FromRow<'_, SqliteRow> for Family {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: uuid_column(row, "id")?,
            name: row.try_get("name")?,
            members: json_column(row, "members")?,
            invite_code: row.try_get("invite_code")?,
            created_by: uuid_column(row, "created_by")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

pub async fn insert_family(pool: &SqlitePool, family: &Family) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO families (id, name, members, invite_code, created_by, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(family.id.to_string())
    .bind(&family.name)
    .bind(Json(&family.members))
    .bind(&family.invite_code)
    .bind(family.created_by.to_string())
    .bind(family.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn save_family(pool: &SqlitePool, family: &Family) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE families SET name = ?2, members = ?3 WHERE id = ?1")
        .bind(family.id.to_string())
        .bind(&family.name)
        .bind(Json(&family.members))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_family(pool: &SqlitePool, id: Uuid) -> Result<Option<Family>, sqlx::Error> {
    sqlx::query_as::<_, Family>("SELECT * FROM families WHERE id = ?1")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
}

/// Look a family up by invite code, ignoring case and surrounding spaces
pub async fn get_family_by_code(pool: &SqlitePool, code: &str) -> Result<Option<Family>, sqlx::Error> {
    sqlx::query_as::<_, Family>("SELECT * FROM families WHERE invite_code = ?1")
        .bind(normalize_invite_code(code))
        .fetch_optional(pool)
        .await
}

pub async fn delete_family(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM families WHERE id = ?1")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}
