//! Models Module
//!
//! This module contains the document types for every collection and the
//! request/response payloads of the HTTP API:
//!
//! - `user` - Profiles, follow status, stats counters and trophies
//! - `recipe` - Recipes, ingredients, ratings and the average rule
//! - `cookbook` - Cookbooks with owned and referenced recipes
//! - `shopping_list` - Shopping lists, items and ingredient merging
//! - `creation` - Creations, likes ("yums") and comments
//! - `notification` - Notification kinds, statuses and constructors
//! - `family` - Families and invite codes
//! - `search` - Global search results
//!
//! References between documents are plain `Uuid`s. Handlers resolve them
//! into the `*View` types when a populated document is returned.

pub mod cookbook;
pub mod creation;
pub mod family;
pub mod notification;
pub mod recipe;
pub mod search;
pub mod shopping_list;
pub mod user;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export all types
pub use cookbook::{
    AddRecipeReferenceRequest, Cookbook, CookbookSummary, CookbookView, CreateCookbookRequest,
    UpdateCookbookRequest,
};
pub use creation::{
    Comment, CommentRequest, CommentView, CreateCreationRequest, Creation, CreationRecipe,
    CreationRecipeInput, CreationRecipeView, CreationView, UpdateCreationRequest, YumResponse,
};
pub use family::{CreateFamilyRequest, Family, FamilyView, JoinFamilyRequest};
pub use notification::{
    ListNotificationsParams, NewNotification, Notification, NotificationKind, NotificationStatus,
    NotificationView, RespondRequest, UnreadCountResponse,
};
pub use recipe::{
    CopiedFrom, CopyRecipeRequest, CreateRecipeRequest, Ingredient, ListRecipesParams, Recipe,
    RecipeRating, RecipeSummary, RecipeView, UpdateRecipeRequest,
};
pub use search::{SearchParams, SearchResponse};
pub use shopping_list::{
    AddItemRequest, AddRecipeToListRequest, CreateShoppingListRequest, RecipeLogEntry,
    ShoppingItem, ShoppingList, UpdateItemRequest, UpdateShoppingListRequest,
};
pub use user::{
    FollowResponse, FollowStatus, PublicProfile, StatChange, Trophy, UpdateProfileRequest,
    UserSearchParams, UserStats, UserSummary,
};

/// Request to invite a user to a cookbook, shopping list or family
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InviteRequest {
    pub user_id: Option<Uuid>,
}

/// Add `id` to `list` unless already present. Returns `true` when added.
pub fn add_reference(list: &mut Vec<Uuid>, id: Uuid) -> bool {
    if list.contains(&id) {
        return false;
    }
    list.push(id);
    true
}

/// Remove every occurrence of `id` from `list`. Returns `true` when removed.
pub fn remove_reference(list: &mut Vec<Uuid>, id: Uuid) -> bool {
    let before = list.len();
    list.retain(|existing| *existing != id);
    list.len() != before
}
