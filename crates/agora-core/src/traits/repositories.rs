//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. The event hub consumes only the read side
//! (`find_*_with_relations`, `count_by_post`); the write path goes through
//! the service layer.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Like, LikeWithRelations, Message, MessageWithRelations, Post, User};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Post>>;

    /// Create a new post
    async fn create(&self, post: &Post) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID (bare, no relations)
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>>;

    /// Find message by ID with its author and likes attached
    ///
    /// This backs the hub's enrichment step before broadcast.
    async fn find_by_id_with_relations(&self, id: Uuid) -> RepoResult<Option<MessageWithRelations>>;

    /// List a post's messages with relations, most recent first
    ///
    /// Backs the initial page snapshot a tab loads before joining the room.
    async fn find_by_post_with_relations(&self, post_id: Uuid)
        -> RepoResult<Vec<MessageWithRelations>>;

    /// Authoritative message count for a post (drift check)
    async fn count_by_post(&self, post_id: Uuid) -> RepoResult<i64>;

    /// Create a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Update a message's text in place
    async fn update_text(&self, id: Uuid, text: &str) -> RepoResult<()>;
}

// ============================================================================
// Like Repository
// ============================================================================

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Find like by ID with its user and owning message attached
    async fn find_by_id_with_relations(&self, id: Uuid) -> RepoResult<Option<LikeWithRelations>>;

    /// Find a like by its (user, message, emoji) tuple
    ///
    /// The tuple is conceptually unique; the service layer looks up before
    /// creating rather than relying on a stored constraint.
    async fn find_by_tuple(
        &self,
        user_id: Uuid,
        message_id: Uuid,
        emoji: &str,
    ) -> RepoResult<Option<LikeWithRelations>>;

    /// Create a new like
    async fn create(&self, like: &Like) -> RepoResult<()>;

    /// Delete a like by ID
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}
