/**
 * Recipe Types
 *
 * A recipe carries its ingredients, ordered instruction steps and the
 * ratings contributed by creations. Each rating remembers which creation
 * produced it so the rating can be withdrawn when that creation is edited
 * or deleted. The average is always derived from the rating list.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;
use crate::shared::error::SharedError;

/// Lowest accepted rating
pub const MIN_RATING: f64 = 0.0;
/// Highest accepted rating
pub const MAX_RATING: f64 = 5.0;

/// One ingredient line
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    pub unit: String,
}

/// A rating left on a recipe through a creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeRating {
    pub user: Uuid,
    pub rating: f64,
    pub creation: Uuid,
}

/// Lineage of a copied recipe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopiedFrom {
    pub recipe: Uuid,
    pub user: Uuid,
}

/// Stored recipe document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub cooking_time: Option<i64>,
    pub servings: Option<i64>,
    pub tags: Vec<String>,
    pub cuisine: String,
    pub meal_type: String,
    pub owner_id: Uuid,
    pub cookbook_id: Option<Uuid>,
    pub copied_from: Option<CopiedFrom>,
    pub ratings: Vec<RecipeRating>,
    pub average_rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Build a new recipe owned by `owner_id` from a validated request.
    pub fn new(owner_id: Uuid, request: CreateRecipeRequest) -> Result<Self, SharedError> {
        let now = Utc::now();
        let mut recipe = Self {
            id: Uuid::new_v4(),
            title: String::new(),
            description: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            cooking_time: None,
            servings: None,
            tags: Vec::new(),
            cuisine: String::new(),
            meal_type: String::new(),
            owner_id,
            cookbook_id: request.cookbook_id,
            copied_from: None,
            ratings: Vec::new(),
            average_rating: None,
            created_at: now,
            updated_at: now,
        };
        recipe.apply_update(UpdateRecipeRequest {
            title: Some(request.title),
            description: request.description,
            ingredients: request.ingredients,
            instructions: request.instructions,
            cooking_time: request.cooking_time,
            servings: request.servings,
            tags: request.tags,
            cuisine: request.cuisine,
            meal_type: request.meal_type,
            cookbook_id: None,
        })?;
        Ok(recipe)
    }

    /// Apply the fields present in `update`. The cookbook move is handled by
    /// the caller since it touches other documents.
    pub fn apply_update(&mut self, update: UpdateRecipeRequest) -> Result<(), SharedError> {
        if let Some(title) = update.title {
            self.title = crate::shared::error::require_text("title", &title)?;
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(ingredients) = update.ingredients {
            self.ingredients = ingredients
                .into_iter()
                .filter(|ingredient| !ingredient.name.trim().is_empty())
                .collect();
        }
        if let Some(instructions) = update.instructions {
            self.instructions = instructions
                .into_iter()
                .map(|step| step.trim().to_string())
                .filter(|step| !step.is_empty())
                .collect();
        }
        if let Some(cooking_time) = update.cooking_time {
            self.cooking_time = Some(non_negative("cooking_time", cooking_time)?);
        }
        if let Some(servings) = update.servings {
            self.servings = Some(non_negative("servings", servings)?);
        }
        if let Some(tags) = update.tags {
            let mut normalized: Vec<String> = Vec::new();
            for tag in tags.iter().map(|tag| tag.trim().to_lowercase()) {
                if !tag.is_empty() && !normalized.contains(&tag) {
                    normalized.push(tag);
                }
            }
            self.tags = normalized;
        }
        if let Some(cuisine) = update.cuisine {
            self.cuisine = cuisine.trim().to_string();
        }
        if let Some(meal_type) = update.meal_type {
            self.meal_type = meal_type.trim().to_string();
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// A fresh copy owned by `new_owner`, without ratings.
    pub fn copy_for(&self, new_owner: Uuid, cookbook_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: new_owner,
            cookbook_id,
            copied_from: Some(CopiedFrom {
                recipe: self.id,
                user: self.owner_id,
            }),
            ratings: Vec::new(),
            average_rating: None,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Append a rating contributed by `creation` and recompute the average.
    pub fn add_rating(&mut self, user: Uuid, rating: f64, creation: Uuid) -> Result<(), SharedError> {
        validate_rating(rating)?;
        self.ratings.push(RecipeRating {
            user,
            rating,
            creation,
        });
        self.recompute_average();
        Ok(())
    }

    /// Drop every rating contributed by `creation`. Returns whether any was removed.
    pub fn remove_ratings_from(&mut self, creation: Uuid) -> bool {
        let before = self.ratings.len();
        self.ratings.retain(|rating| rating.creation != creation);
        let removed = self.ratings.len() != before;
        if removed {
            self.recompute_average();
        }
        removed
    }

    pub fn recompute_average(&mut self) {
        self.average_rating = average(&self.ratings);
    }

    /// Lower-cased searchable fields joined by `SEARCH_FIELD_SEPARATOR`.
    ///
    /// Stored alongside the document so the store can filter on it.
    pub fn search_text(&self) -> String {
        let mut fields = vec![
            self.title.as_str(),
            self.description.as_str(),
            self.cuisine.as_str(),
            self.meal_type.as_str(),
        ];
        fields.extend(self.tags.iter().map(String::as_str));
        fields.extend(self.ingredients.iter().map(|ingredient| ingredient.name.as_str()));
        search_text(&fields)
    }

    /// Whether any searchable field contains `needle`, ignoring case
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        self.search_text()
            .split(SEARCH_FIELD_SEPARATOR)
            .any(|field| field.contains(&needle))
    }
}

/// Separates fields inside a stored `search_text`
pub const SEARCH_FIELD_SEPARATOR: char = '\u{1f}';

/// Join `fields` into one lower-cased string for substring search
pub fn search_text(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| field.to_lowercase())
        .collect::<Vec<_>>()
        .join(&SEARCH_FIELD_SEPARATOR.to_string())
}

/// Arithmetic mean of the ratings, `None` when there are none.
pub fn average(ratings: &[RecipeRating]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: f64 = ratings.iter().map(|r| r.rating).sum();
    Some(sum / ratings.len() as f64)
}

/// Ratings must lie within 0-5 inclusive.
pub fn validate_rating(rating: f64) -> Result<f64, SharedError> {
    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(SharedError::validation(
            "rating",
            "Rating must be between 0 and 5",
        ));
    }
    Ok(rating)
}

fn non_negative(field: &str, value: i64) -> Result<i64, SharedError> {
    if value < 0 {
        return Err(SharedError::validation(
            field,
            format!("{} cannot be negative", field),
        ));
    }
    Ok(value)
}

/// Recipe with its owner resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeView {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub owner: Option<UserSummary>,
}

/// Compact recipe reference used in lists and search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Uuid,
    pub average_rating: Option<f64>,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            owner_id: recipe.owner_id,
            average_rating: recipe.average_rating,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<String>>,
    pub cooking_time: Option<i64>,
    pub servings: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub cuisine: Option<String>,
    pub meal_type: Option<String>,
    pub cookbook_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<String>>,
    pub cooking_time: Option<i64>,
    pub servings: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub cuisine: Option<String>,
    pub meal_type: Option<String>,
    pub cookbook_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyRecipeRequest {
    pub cookbook_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListRecipesParams {
    pub cookbook_id: Option<Uuid>,
}
