//! User Profile Types
//!
//! Public-facing user data: summaries used when populating references,
//! profiles, stats counters and trophies. The stored user document (with the
//! password hash) lives in `backend::auth::users`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimal user reference returned inside populated documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
}

/// Activity counters kept on the user document
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserStats {
    pub recipes: u32,
    pub creations: u32,
    pub cookbooks: u32,
    pub yums_received: u32,
}

/// A change to one counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatChange {
    Recipes(i32),
    Creations(i32),
    Cookbooks(i32),
    YumsReceived(i32),
}

impl UserStats {
    /// Apply a change; counters never go below zero.
    pub fn apply(&mut self, change: StatChange) {
        let (counter, delta) = match change {
            StatChange::Recipes(d) => (&mut self.recipes, d),
            StatChange::Creations(d) => (&mut self.creations, d),
            StatChange::Cookbooks(d) => (&mut self.cookbooks, d),
            StatChange::YumsReceived(d) => (&mut self.yums_received, d),
        };
        *counter = counter.saturating_add_signed(delta);
    }
}

/// Achievements awarded when a counter crosses a threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Trophy {
    FirstRecipe,
    TenRecipes,
    FirstCreation,
    TenCreations,
    FirstCookbook,
    TenYums,
}

impl Trophy {
    pub const ALL: [Trophy; 6] = [
        Trophy::FirstRecipe,
        Trophy::TenRecipes,
        Trophy::FirstCreation,
        Trophy::TenCreations,
        Trophy::FirstCookbook,
        Trophy::TenYums,
    ];

    /// Whether `stats` satisfies this trophy's threshold
    pub fn is_earned(&self, stats: &UserStats) -> bool {
        match self {
            Trophy::FirstRecipe => stats.recipes >= 1,
            Trophy::TenRecipes => stats.recipes >= 10,
            Trophy::FirstCreation => stats.creations >= 1,
            Trophy::TenCreations => stats.creations >= 10,
            Trophy::FirstCookbook => stats.cookbooks >= 1,
            Trophy::TenYums => stats.yums_received >= 10,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Trophy::FirstRecipe => "First Recipe",
            Trophy::TenRecipes => "Recipe Collector",
            Trophy::FirstCreation => "First Creation",
            Trophy::TenCreations => "Seasoned Cook",
            Trophy::FirstCookbook => "Cookbook Author",
            Trophy::TenYums => "Crowd Pleaser",
        }
    }

    /// Trophies earned by `stats` that are not in `held` yet.
    pub fn newly_earned(stats: &UserStats, held: &[Trophy]) -> Vec<Trophy> {
        Trophy::ALL
            .into_iter()
            .filter(|trophy| trophy.is_earned(stats) && !held.contains(trophy))
            .collect()
    }
}

/// Profile as seen by another user
///
/// When the profile is private and the viewer is neither the owner nor a
/// follower, `restricted` is set and stats/trophies are withheld.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    pub is_private: bool,
    pub followers_count: usize,
    pub following_count: usize,
    pub is_following: bool,
    pub restricted: bool,
    pub stats: Option<UserStats>,
    pub trophies: Vec<Trophy>,
    pub created_at: DateTime<Utc>,
}

/// Partial profile update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub is_private: Option<bool>,
}

/// Query parameters for user search
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserSearchParams {
    pub q: String,
}

/// Relationship after a follow/unfollow call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FollowStatus {
    Following,
    Requested,
    NotFollowing,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowResponse {
    pub status: FollowStatus,
}
