/**
 * Notification Types
 *
 * Notifications are created synchronously by the mutations that cause them
 * (invites, follows, likes, comments, mentions). Invite and follow-request
 * notifications start out `pending` and are answered through the respond
 * endpoint; every other kind carries no status.
 *
 * The `data` payload is kind specific, e.g. `{"cookbook_id": ...}` for a
 * cookbook invite or `{"creation_id": ...}` for a yum.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::user::UserSummary;

/// What caused a notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    CookbookInvite,
    ShoppingListInvite,
    FamilyInvite,
    FollowRequest,
    Follow,
    Yum,
    Comment,
    Mention,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::CookbookInvite => "cookbook_invite",
            NotificationKind::ShoppingListInvite => "shopping_list_invite",
            NotificationKind::FamilyInvite => "family_invite",
            NotificationKind::FollowRequest => "follow_request",
            NotificationKind::Follow => "follow",
            NotificationKind::Yum => "yum",
            NotificationKind::Comment => "comment",
            NotificationKind::Mention => "mention",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cookbook_invite" => Some(NotificationKind::CookbookInvite),
            "shopping_list_invite" => Some(NotificationKind::ShoppingListInvite),
            "family_invite" => Some(NotificationKind::FamilyInvite),
            "follow_request" => Some(NotificationKind::FollowRequest),
            "follow" => Some(NotificationKind::Follow),
            "yum" => Some(NotificationKind::Yum),
            "comment" => Some(NotificationKind::Comment),
            "mention" => Some(NotificationKind::Mention),
            _ => None,
        }
    }

    /// Kinds that wait for an accept/decline answer
    pub fn needs_response(&self) -> bool {
        matches!(
            self,
            NotificationKind::CookbookInvite
                | NotificationKind::ShoppingListInvite
                | NotificationKind::FamilyInvite
                | NotificationKind::FollowRequest
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Pending,
    Accepted,
    Declined,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Accepted => "accepted",
            NotificationStatus::Declined => "declined",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(NotificationStatus::Pending),
            "accepted" => Some(NotificationStatus::Accepted),
            "declined" => Some(NotificationStatus::Declined),
            _ => None,
        }
    }
}

/// Stored notification document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: Value,
    pub read: bool,
    pub status: Option<NotificationStatus>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_pending(&self) -> bool {
        self.status == Some(NotificationStatus::Pending)
    }

    /// Read a UUID field out of the data payload
    pub fn data_id(&self, key: &str) -> Option<Uuid> {
        self.data
            .get(key)
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }
}

/// A notification about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: Value,
}

impl NewNotification {
    pub fn new(
        kind: NotificationKind,
        recipient_id: Uuid,
        sender_id: Uuid,
        title: impl Into<String>,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            recipient_id,
            sender_id: Some(sender_id),
            kind,
            title: title.into(),
            message: message.into(),
            data,
        }
    }

    pub fn cookbook_invite(recipient: Uuid, sender: &UserSummary, cookbook_id: Uuid, cookbook_name: &str) -> Self {
        Self::new(
            NotificationKind::CookbookInvite,
            recipient,
            sender.id,
            "Cookbook invitation",
            format!("{} invited you to the cookbook \"{}\"", sender.name, cookbook_name),
            json!({ "cookbook_id": cookbook_id }),
        )
    }

    pub fn shopping_list_invite(recipient: Uuid, sender: &UserSummary, list_id: Uuid, list_name: &str) -> Self {
        Self::new(
            NotificationKind::ShoppingListInvite,
            recipient,
            sender.id,
            "Shopping list invitation",
            format!("{} invited you to the shopping list \"{}\"", sender.name, list_name),
            json!({ "shopping_list_id": list_id }),
        )
    }

    pub fn family_invite(recipient: Uuid, sender: &UserSummary, family_id: Uuid, family_name: &str) -> Self {
        Self::new(
            NotificationKind::FamilyInvite,
            recipient,
            sender.id,
            "Family invitation",
            format!("{} invited you to join the family \"{}\"", sender.name, family_name),
            json!({ "family_id": family_id }),
        )
    }

    pub fn follow_request(recipient: Uuid, sender: &UserSummary) -> Self {
        Self::new(
            NotificationKind::FollowRequest,
            recipient,
            sender.id,
            "Follow request",
            format!("{} wants to follow you", sender.name),
            json!({ "user_id": sender.id }),
        )
    }

    pub fn follow(recipient: Uuid, sender: &UserSummary) -> Self {
        Self::new(
            NotificationKind::Follow,
            recipient,
            sender.id,
            "New follower",
            format!("{} started following you", sender.name),
            json!({ "user_id": sender.id }),
        )
    }

    pub fn yum(recipient: Uuid, sender: &UserSummary, creation_id: Uuid, creation_title: &str) -> Self {
        Self::new(
            NotificationKind::Yum,
            recipient,
            sender.id,
            "Yum!",
            format!("{} said yum to \"{}\"", sender.name, creation_title),
            json!({ "creation_id": creation_id }),
        )
    }

    pub fn comment(recipient: Uuid, sender: &UserSummary, creation_id: Uuid, comment_id: Uuid, text: &str) -> Self {
        Self::new(
            NotificationKind::Comment,
            recipient,
            sender.id,
            "New comment",
            format!("{} commented: {}", sender.name, preview(text)),
            json!({ "creation_id": creation_id, "comment_id": comment_id }),
        )
    }

    pub fn mention(recipient: Uuid, sender: &UserSummary, creation_id: Uuid, context: &str) -> Self {
        Self::new(
            NotificationKind::Mention,
            recipient,
            sender.id,
            "You were mentioned",
            format!("{} mentioned you in {}", sender.name, context),
            json!({ "creation_id": creation_id }),
        )
    }

    /// Initial status for this kind
    pub fn initial_status(&self) -> Option<NotificationStatus> {
        self.kind.needs_response().then_some(NotificationStatus::Pending)
    }
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 80;
    if text.chars().count() <= LIMIT {
        return text.to_string();
    }
    let cut: String = text.chars().take(LIMIT).collect();
    format!("{}...", cut)
}

/// Notification with the sender resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationView {
    #[serde(flatten)]
    pub notification: Notification,
    pub sender: Option<UserSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListNotificationsParams {
    pub unread: Option<bool>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RespondRequest {
    pub accept: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnreadCountResponse {
    pub count: i64,
}
