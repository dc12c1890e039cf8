//! Creation Types
//!
//! A creation logs one cooking session: the recipes used (each with an
//! optional rating), who cooked and who ate, a photo, likes ("yums") and an
//! embedded comment thread.
//!
//! `chef` and `eaten_with` keep the free text the author typed; `chef_id`
//! and `eaten_with_users` hold the users that text resolved to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recipe::{validate_rating, RecipeSummary};
use super::user::UserSummary;
use crate::shared::error::{require_text, SharedError};

/// Most creations returned by the feed
pub const FEED_LIMIT: i64 = 50;

/// A recipe used in a creation, with the rating given to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreationRecipe {
    pub recipe: Uuid,
    pub rating: Option<f64>,
}

/// Embedded comment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub mentions: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(user: Uuid, text: &str, mentions: Vec<Uuid>) -> Result<Self, SharedError> {
        Ok(Self {
            id: Uuid::new_v4(),
            user,
            text: require_text("text", text)?,
            mentions,
            created_at: Utc::now(),
            updated_at: None,
        })
    }
}

/// Stored creation document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Creation {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub recipes: Vec<CreationRecipe>,
    pub chef_name: String,
    pub eaten_with: String,
    pub chef_id: Option<Uuid>,
    pub eaten_with_users: Vec<Uuid>,
    pub likes: Vec<Uuid>,
    pub comments: Vec<Comment>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Creation {
    pub fn new(owner_id: Uuid, title: &str) -> Result<Self, SharedError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title: require_text("title", title)?,
            description: String::new(),
            image_url: None,
            recipes: Vec::new(),
            chef_name: String::new(),
            eaten_with: String::new(),
            chef_id: None,
            eaten_with_users: Vec::new(),
            likes: Vec::new(),
            comments: Vec::new(),
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Toggle `user_id`'s like. Returns `true` when the creation is now liked.
    pub fn toggle_like(&mut self, user_id: Uuid) -> bool {
        if let Some(pos) = self.likes.iter().position(|id| *id == user_id) {
            self.likes.remove(pos);
            false
        } else {
            self.likes.push(user_id);
            true
        }
    }

    pub fn recipe_ids(&self) -> Vec<Uuid> {
        self.recipes.iter().map(|r| r.recipe).collect()
    }

    pub fn comment_mut(&mut self, comment_id: Uuid) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == comment_id)
    }
}

/// Validate the recipe list of a create/update payload.
///
/// At least one recipe is required; the same recipe may only appear once.
pub fn validate_recipe_inputs(
    inputs: &[CreationRecipeInput],
) -> Result<Vec<CreationRecipe>, SharedError> {
    if inputs.is_empty() {
        return Err(SharedError::validation(
            "recipes",
            "At least one recipe is required",
        ));
    }
    let mut recipes: Vec<CreationRecipe> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let recipe = input
            .recipe_id
            .ok_or_else(|| SharedError::validation("recipes", "recipe_id is required"))?;
        let rating = input.rating.map(validate_rating).transpose()?;
        if recipes.iter().any(|r| r.recipe == recipe) {
            continue;
        }
        recipes.push(CreationRecipe { recipe, rating });
    }
    Ok(recipes)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreationRecipeView {
    pub recipe: Option<RecipeSummary>,
    pub recipe_id: Uuid,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentView {
    pub id: Uuid,
    pub user: Option<UserSummary>,
    pub text: String,
    pub mentions: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Creation with recipes, people and comment authors resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreationView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub recipes: Vec<CreationRecipeView>,
    pub chef_name: String,
    pub eaten_with: String,
    pub chef: Option<UserSummary>,
    pub eaten_with_users: Vec<UserSummary>,
    pub likes: usize,
    pub liked: bool,
    pub comments: Vec<CommentView>,
    pub owner: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CreationRecipeInput {
    pub recipe_id: Option<Uuid>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateCreationRequest {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub recipes: Vec<CreationRecipeInput>,
    pub chef: Option<String>,
    pub eaten_with: Option<String>,
    pub chef_id: Option<Uuid>,
    pub eaten_with_user_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateCreationRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub recipes: Option<Vec<CreationRecipeInput>>,
    pub chef: Option<String>,
    pub eaten_with: Option<String>,
    pub chef_id: Option<Uuid>,
    pub eaten_with_user_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct YumResponse {
    pub liked: bool,
    pub likes: usize,
}
