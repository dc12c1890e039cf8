//! Profiles Backend Module
//!
//! User profiles, the follow graph, stats counters and trophies.
//!
//! - **`follow`** - Writing follow edges on both users
//! - **`stats`** - Counter updates and trophy awards
//! - **`handlers`** - `/api/users` endpoints

pub mod follow;
pub mod handlers;
pub mod stats;

use uuid::Uuid;

use crate::backend::auth::users::User;

pub use handlers::{
    follow_user, get_profile, list_followers, list_following, public_profile, remove_follower,
    search_profiles, unfollow_user, update_profile,
};
pub use stats::record_stat;

/// Whether `viewer_id` may see the full profile and content of `target`
pub fn can_view_profile(target: &User, viewer_id: Uuid) -> bool {
    !target.is_private || target.id == viewer_id || target.is_followed_by(viewer_id)
}
