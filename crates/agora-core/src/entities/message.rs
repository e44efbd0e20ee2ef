//! Message entity - a comment in a post's reply tree

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LikeWithUser, User};

/// Message entity
///
/// Messages form a tree via `parent_id` (`None` means top-level). The parent,
/// if set, must belong to the same post. Messages are edited in place and
/// never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub post_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Create a new top-level Message
    pub fn new(id: Uuid, post_id: Uuid, user_id: Uuid, text: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            post_id,
            parent_id: None,
            user_id,
            text,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a reply to another message
    pub fn new_reply(id: Uuid, post_id: Uuid, user_id: Uuid, text: String, parent_id: Uuid) -> Self {
        let mut message = Self::new(id, post_id, user_id, text);
        message.parent_id = Some(parent_id);
        message
    }

    /// Check if this message is a reply
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Edit the message text
    pub fn edit(&mut self, text: String) {
        self.text = text;
        self.updated_at = Utc::now();
    }

    /// Check if the message text is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A message enriched with its author and likes, as broadcast over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageWithRelations {
    #[serde(flatten)]
    pub message: Message,
    pub user: User,
    #[serde(default)]
    pub likes: Vec<LikeWithUser>,
}

impl MessageWithRelations {
    /// Create an enriched message with no likes yet
    pub fn new(message: Message, user: User) -> Self {
        Self {
            message,
            user,
            likes: Vec::new(),
        }
    }

    /// The message id
    #[inline]
    pub fn id(&self) -> Uuid {
        self.message.id
    }

    /// The owning post id
    #[inline]
    pub fn post_id(&self) -> Uuid {
        self.message.post_id
    }

    /// Check whether a like with the given id is already attached
    pub fn has_like(&self, like_id: Uuid) -> bool {
        self.likes.iter().any(|l| l.like.id == like_id)
    }
}
