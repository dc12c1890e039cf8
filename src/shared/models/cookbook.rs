//! Cookbook Types
//!
//! A cookbook owns some recipes (their `cookbook_id` points back at it) and
//! references others without copying them. Invited users may add recipes
//! and see the cookbook even when it is private.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recipe::{search_text, RecipeSummary};
use super::user::UserSummary;
use crate::shared::error::{require_text, SharedError};

/// Stored cookbook document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cookbook {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub recipes: Vec<Uuid>,
    pub referenced_recipes: Vec<Uuid>,
    pub owner_id: Uuid,
    pub invited_users: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cookbook {
    pub fn new(owner_id: Uuid, request: CreateCookbookRequest) -> Result<Self, SharedError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: require_text("name", &request.name)?,
            description: request.description.unwrap_or_default().trim().to_string(),
            is_private: request.is_private.unwrap_or(false),
            recipes: Vec::new(),
            referenced_recipes: Vec::new(),
            owner_id,
            invited_users: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, update: UpdateCookbookRequest) -> Result<(), SharedError> {
        if let Some(name) = update.name {
            self.name = require_text("name", &name)?;
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(is_private) = update.is_private {
            self.is_private = is_private;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Owner or invited user
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.is_owner(user_id) || self.invited_users.contains(&user_id)
    }

    pub fn can_view(&self, user_id: Uuid) -> bool {
        !self.is_private || self.is_member(user_id)
    }

    /// Lower-cased name and description, as stored for search
    pub fn search_text(&self) -> String {
        search_text(&[self.name.as_str(), self.description.as_str()])
    }
}

/// Cookbook with every reference resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CookbookView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub recipes: Vec<RecipeSummary>,
    pub referenced_recipes: Vec<RecipeSummary>,
    pub owner: Option<UserSummary>,
    pub invited_users: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CookbookSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub owner_id: Uuid,
    pub recipe_count: usize,
}

impl From<&Cookbook> for CookbookSummary {
    fn from(cookbook: &Cookbook) -> Self {
        Self {
            id: cookbook.id,
            name: cookbook.name.clone(),
            description: cookbook.description.clone(),
            is_private: cookbook.is_private,
            owner_id: cookbook.owner_id,
            recipe_count: cookbook.recipes.len() + cookbook.referenced_recipes.len(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateCookbookRequest {
    pub name: String,
    pub description: Option<String>,
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateCookbookRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddRecipeReferenceRequest {
    pub recipe_id: Option<Uuid>,
}
