//! User entity - the author attached to messages and likes

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity
///
/// Users are managed by an external auth service; this layer only reads them
/// to denormalize author information onto broadcast payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Create a new User
    pub fn new(id: Uuid, username: String) -> Self {
        Self {
            id,
            username,
            avatar: None,
        }
    }

    /// Check if the user has an avatar set
    #[inline]
    pub fn has_avatar(&self) -> bool {
        self.avatar.is_some()
    }
}
