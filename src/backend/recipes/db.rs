//! Database operations for recipes

use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row, SqlitePool};
use uuid::Uuid;

use crate::backend::db::{json_column, like_pattern, opt_json_column, opt_uuid_column, text_column, uuid_column};
use crate::shared::models::Recipe;

impl FromRow<'_, SqliteRow> for Recipe {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: uuid_column(row, "id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            ingredients: json_column(row, "ingredients")?,
            instructions: json_column(row, "instructions")?,
            cooking_time: row.try_get("cooking_time")?,
            servings: row.try_get("servings")?,
            tags: json_column(row, "tags")?,
            cuisine: text_column(row, "cuisine")?,
            meal_type: text_column(row, "meal_type")?,
            owner_id: uuid_column(row, "owner_id")?,
            cookbook_id: opt_uuid_column(row, "cookbook_id")?,
            copied_from: opt_json_column(row, "copied_from")?,
            ratings: json_column(row, "ratings")?,
            average_rating: row.try_get("average_rating")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

pub async fn insert_recipe(pool: &SqlitePool, recipe: &Recipe) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO recipes (id, title, description, ingredients, instructions, cooking_time, servings,
                             tags, cuisine, meal_type, owner_id, cookbook_id, copied_from, ratings,
                             average_rating, search_text, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
        "#,
    )
    .bind(recipe.id.to_string())
    .bind(&recipe.title)
    .bind(&recipe.description)
    .bind(Json(&recipe.ingredients))
    .bind(Json(&recipe.instructions))
    .bind(recipe.cooking_time)
    .bind(recipe.servings)
    .bind(Json(&recipe.tags))
    .bind(&recipe.cuisine)
    .bind(&recipe.meal_type)
    .bind(recipe.owner_id.to_string())
    .bind(recipe.cookbook_id.map(|id| id.to_string()))
    .bind(recipe.copied_from.as_ref().map(Json))
    .bind(Json(&recipe.ratings))
    .bind(recipe.average_rating)
    .bind(recipe.search_text())
    .bind(recipe.created_at)
    .bind(recipe.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Write the whole document back
pub async fn save_recipe(pool: &SqlitePool, recipe: &Recipe) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE recipes
        SET title = ?2, description = ?3, ingredients = ?4, instructions = ?5, cooking_time = ?6,
            servings = ?7, tags = ?8, cuisine = ?9, meal_type = ?10, cookbook_id = ?11,
            ratings = ?12, average_rating = ?13, search_text = ?14, updated_at = ?15
        WHERE id = ?1
        "#,
    )
    .bind(recipe.id.to_string())
    .bind(&recipe.title)
    .bind(&recipe.description)
    .bind(Json(&recipe.ingredients))
    .bind(Json(&recipe.instructions))
    .bind(recipe.cooking_time)
    .bind(recipe.servings)
    .bind(Json(&recipe.tags))
    .bind(&recipe.cuisine)
    .bind(&recipe.meal_type)
    .bind(recipe.cookbook_id.map(|id| id.to_string()))
    .bind(Json(&recipe.ratings))
    .bind(recipe.average_rating)
    .bind(recipe.search_text())
    .bind(recipe.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_recipe(pool: &SqlitePool, id: Uuid) -> Result<Option<Recipe>, sqlx::Error> {
    sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = ?1")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
}

/// Fetch several recipes, in the order of `ids`, skipping unknown ids
pub async fn get_recipes_by_ids(pool: &SqlitePool, ids: &[Uuid]) -> Result<Vec<Recipe>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let wanted: Vec<String> = ids.iter().map(Uuid::to_string).collect();
    let recipes = sqlx::query_as::<_, Recipe>(
        "SELECT * FROM recipes WHERE id IN (SELECT value FROM json_each(?1))",
    )
    .bind(Json(&wanted))
    .fetch_all(pool)
    .await?;

    Ok(ids
        .iter()
        .filter_map(|id| recipes.iter().find(|r| r.id == *id).cloned())
        .collect())
}

/// A user's recipes, newest first, optionally limited to one cookbook
pub async fn list_recipes_by_owner(
    pool: &SqlitePool,
    owner_id: Uuid,
    cookbook_id: Option<Uuid>,
) -> Result<Vec<Recipe>, sqlx::Error> {
    sqlx::query_as::<_, Recipe>(
        r#"
        SELECT * FROM recipes
        WHERE owner_id = ?1 AND (?2 IS NULL OR cookbook_id = ?2)
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(owner_id.to_string())
    .bind(cookbook_id.map(|id| id.to_string()))
    .fetch_all(pool)
    .await
}

pub async fn delete_recipe(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM recipes WHERE id = ?1")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

/// Detach every recipe from a cookbook that is going away
pub async fn clear_cookbook(pool: &SqlitePool, cookbook_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE recipes SET cookbook_id = NULL WHERE cookbook_id = ?1")
        .bind(cookbook_id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Recipes matching `term` that `viewer_id` may read, newest first.
///
/// A recipe is hidden when it sits in a private cookbook the viewer neither
/// owns nor was invited to, unless the viewer owns the recipe itself.
pub async fn search_visible_recipes(
    pool: &SqlitePool,
    term: &str,
    viewer_id: Uuid,
    limit: i64,
) -> Result<Vec<Recipe>, sqlx::Error> {
    sqlx::query_as::<_, Recipe>(
        r#"
        SELECT recipes.* FROM recipes
        LEFT JOIN cookbooks ON cookbooks.id = recipes.cookbook_id
        WHERE recipes.search_text LIKE ?1 ESCAPE '\'
          AND (recipes.owner_id = ?2
               OR cookbooks.id IS NULL
               OR cookbooks.is_private = FALSE
               OR cookbooks.owner_id = ?2
               OR EXISTS (SELECT 1 FROM json_each(cookbooks.invited_users) WHERE value = ?2))
        ORDER BY recipes.created_at DESC, recipes.rowid DESC
        LIMIT ?3
        "#,
    )
    .bind(like_pattern(term))
    .bind(viewer_id.to_string())
    .bind(limit)
    .fetch_all(pool)
    .await
}
