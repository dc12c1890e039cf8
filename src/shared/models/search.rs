//! Global search payloads

use serde::{Deserialize, Serialize};

use super::cookbook::CookbookSummary;
use super::recipe::RecipeSummary;
use super::user::UserSummary;

/// Result caps per collection
pub const RECIPE_LIMIT: usize = 20;
pub const USER_LIMIT: usize = 10;
pub const COOKBOOK_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub recipes: Vec<RecipeSummary>,
    pub users: Vec<UserSummary>,
    pub cookbooks: Vec<CookbookSummary>,
}
