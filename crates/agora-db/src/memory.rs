//! In-memory store implementing the repository traits
//!
//! Backs tests and demos; the event hub is generic over the traits so the
//! Postgres and in-memory stores are interchangeable.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use agora_core::entities::{Like, LikeWithRelations, LikeWithUser, Message, MessageWithRelations, Post, User};
use agora_core::traits::{LikeRepository, MessageRepository, PostRepository, RepoResult, UserRepository};
use agora_core::DomainError;

/// In-memory repository set
///
/// Messages and likes are kept in insertion order so "most recent first"
/// queries are stable even when timestamps collide in fast tests.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<User>>,
    posts: RwLock<Vec<Post>>,
    messages: RwLock<Vec<Message>>,
    likes: RwLock<Vec<Like>>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new store wrapped in Arc
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Seed a user (users have no create operation on the trait)
    pub fn seed_user(&self, user: User) {
        self.users.write().push(user);
    }

    fn user(&self, id: Uuid) -> Option<User> {
        self.users.read().iter().find(|u| u.id == id).cloned()
    }

    fn likes_for_message(&self, message_id: Uuid) -> RepoResult<Vec<LikeWithUser>> {
        let likes = self.likes.read();
        likes
            .iter()
            .filter(|l| l.message_id == message_id)
            .map(|l| {
                let user = self
                    .user(l.user_id)
                    .ok_or(DomainError::UserNotFound(l.user_id))?;
                Ok(LikeWithUser::new(l.clone(), user))
            })
            .collect()
    }

    fn enrich_message(&self, message: Message) -> RepoResult<MessageWithRelations> {
        let user = self
            .user(message.user_id)
            .ok_or(DomainError::UserNotFound(message.user_id))?;
        let likes = self.likes_for_message(message.id)?;
        let mut enriched = MessageWithRelations::new(message, user);
        enriched.likes = likes;
        Ok(enriched)
    }

    fn enrich_like(&self, like: Like) -> RepoResult<LikeWithRelations> {
        let user = self
            .user(like.user_id)
            .ok_or(DomainError::UserNotFound(like.user_id))?;
        let message = self
            .messages
            .read()
            .iter()
            .find(|m| m.id == like.message_id)
            .cloned()
            .ok_or(DomainError::MessageNotFound(like.message_id))?;
        Ok(LikeWithRelations::new(like, user, message))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.user(id))
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Post>> {
        Ok(self.posts.read().iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, post: &Post) -> RepoResult<()> {
        self.posts.write().push(post.clone());
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        Ok(self.messages.read().iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_id_with_relations(&self, id: Uuid) -> RepoResult<Option<MessageWithRelations>> {
        let message = self.messages.read().iter().find(|m| m.id == id).cloned();
        match message {
            Some(message) => Ok(Some(self.enrich_message(message)?)),
            None => Ok(None),
        }
    }

    async fn find_by_post_with_relations(
        &self,
        post_id: Uuid,
    ) -> RepoResult<Vec<MessageWithRelations>> {
        let messages: Vec<Message> = self
            .messages
            .read()
            .iter()
            .rev()
            .filter(|m| m.post_id == post_id)
            .cloned()
            .collect();

        messages
            .into_iter()
            .map(|m| self.enrich_message(m))
            .collect()
    }

    async fn count_by_post(&self, post_id: Uuid) -> RepoResult<i64> {
        let count = self
            .messages
            .read()
            .iter()
            .filter(|m| m.post_id == post_id)
            .count();
        Ok(count as i64)
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.messages.write().push(message.clone());
        Ok(())
    }

    async fn update_text(&self, id: Uuid, text: &str) -> RepoResult<()> {
        let mut messages = self.messages.write();
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(DomainError::MessageNotFound(id))?;
        message.edit(text.to_string());
        Ok(())
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn find_by_id_with_relations(&self, id: Uuid) -> RepoResult<Option<LikeWithRelations>> {
        let like = self.likes.read().iter().find(|l| l.id == id).cloned();
        match like {
            Some(like) => Ok(Some(self.enrich_like(like)?)),
            None => Ok(None),
        }
    }

    async fn find_by_tuple(
        &self,
        user_id: Uuid,
        message_id: Uuid,
        emoji: &str,
    ) -> RepoResult<Option<LikeWithRelations>> {
        let like = self
            .likes
            .read()
            .iter()
            .find(|l| l.user_id == user_id && l.message_id == message_id && l.emoji == emoji)
            .cloned();
        match like {
            Some(like) => Ok(Some(self.enrich_like(like)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, like: &Like) -> RepoResult<()> {
        self.likes.write().push(like.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.likes.write().retain(|l| l.id != id);
        Ok(())
    }
}
