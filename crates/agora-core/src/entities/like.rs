//! Like entity - an emoji reaction on a message

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Message, User};

/// Like entity
///
/// At most one like exists per (user, message, emoji) tuple, enforced by
/// lookup-before-create in the service layer rather than a stored constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: Uuid,
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

impl Like {
    /// Create a new Like
    pub fn new(id: Uuid, message_id: Uuid, user_id: Uuid, emoji: String) -> Self {
        Self {
            id,
            message_id,
            user_id,
            emoji,
            created_at: Utc::now(),
        }
    }

    /// Check if this like uses a specific emoji
    #[inline]
    pub fn is_emoji(&self, emoji: &str) -> bool {
        self.emoji == emoji
    }
}

/// A like with its user attached, as embedded in enriched messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeWithUser {
    #[serde(flatten)]
    pub like: Like,
    pub user: User,
}

impl LikeWithUser {
    pub fn new(like: Like, user: User) -> Self {
        Self { like, user }
    }
}

/// A like with its user and owning message attached
///
/// This is the shape broadcast for like events; the embedded message lets the
/// hub resolve the post room without a second lookup, and lets receivers find
/// the cache entry to attach the like to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeWithRelations {
    #[serde(flatten)]
    pub like: Like,
    pub user: User,
    pub message: Message,
}

impl LikeWithRelations {
    pub fn new(like: Like, user: User, message: Message) -> Self {
        Self { like, user, message }
    }

    /// The post room this like's events belong to
    #[inline]
    pub fn post_id(&self) -> Uuid {
        self.message.post_id
    }

    /// Drop the message relation, keeping the user
    pub fn into_like_with_user(self) -> LikeWithUser {
        LikeWithUser {
            like: self.like,
            user: self.user,
        }
    }
}
