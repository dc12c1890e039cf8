/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by authentication handlers.
 * These types are shared across signup, login, and get_me handlers.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::shared::models::{Trophy, UserStats};

/// Sign up request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct SignupRequest {
    /// Display name
    pub name: String,
    /// User's email address
    pub email: String,
    /// User's password (will be hashed before storage)
    pub password: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    /// User's password (will be verified against stored hash)
    pub password: String,
}

/// Auth response
///
/// Returned by signup and login handlers. Contains the JWT token
/// and user information for immediate authentication.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    /// Session token (also set as the `session` cookie)
    pub token: String,
    /// User information (without sensitive data)
    pub user: UserResponse,
}

/// The caller's own profile (without the password hash)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub is_private: bool,
    pub family_id: Option<Uuid>,
    pub followers_count: usize,
    pub following_count: usize,
    pub stats: UserStats,
    pub trophies: Vec<Trophy>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            is_private: user.is_private,
            family_id: user.family_id,
            followers_count: user.followers.len(),
            following_count: user.following.len(),
            stats: user.stats,
            trophies: user.trophies.clone(),
            created_at: user.created_at,
        }
    }
}
