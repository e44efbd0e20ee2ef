//! Service context - dependency container for services
//!
//! Holds the repository trait objects needed by services and by the hub's
//! enrichment step.

use std::sync::Arc;

use agora_core::traits::{LikeRepository, MessageRepository, PostRepository, UserRepository};

/// Service context containing all repository dependencies
#[derive(Clone)]
pub struct ServiceContext {
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
    message_repo: Arc<dyn MessageRepository>,
    like_repo: Arc<dyn LikeRepository>,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        post_repo: Arc<dyn PostRepository>,
        message_repo: Arc<dyn MessageRepository>,
        like_repo: Arc<dyn LikeRepository>,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            message_repo,
            like_repo,
        }
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the like repository
    pub fn like_repo(&self) -> &dyn LikeRepository {
        self.like_repo.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext").finish()
    }
}
