//! Family Types
//!
//! A family is a small group of users sharing an invite code. A user belongs
//! to at most one family; the family is deleted when its last member leaves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;
use crate::shared::error::{require_text, SharedError};

/// Length of a family invite code
pub const INVITE_CODE_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Family {
    pub id: Uuid,
    pub name: String,
    pub members: Vec<Uuid>,
    pub invite_code: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Family {
    pub fn new(creator: Uuid, name: &str) -> Result<Self, SharedError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: require_text("name", name)?,
            members: vec![creator],
            invite_code: generate_invite_code(),
            created_by: creator,
            created_at: Utc::now(),
        })
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }
}

/// Eight uppercase alphanumeric characters taken from a random UUID.
pub fn generate_invite_code() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(INVITE_CODE_LEN)
        .collect()
}

/// Codes are compared case-insensitively.
pub fn normalize_invite_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FamilyView {
    pub id: Uuid,
    pub name: String,
    pub invite_code: String,
    pub members: Vec<UserSummary>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateFamilyRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinFamilyRequest {
    pub invite_code: String,
}
