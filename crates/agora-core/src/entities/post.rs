//! Post entity - a discussion topic owning a comment tree

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity
///
/// Immutable after creation; messages attach to it via `post_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    /// URL of the post's header image
    pub image: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new Post
    pub fn new(id: Uuid, title: String, image: String, user_id: Uuid) -> Self {
        Self {
            id,
            title,
            image,
            user_id,
            created_at: Utc::now(),
        }
    }
}
