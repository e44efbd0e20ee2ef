//! Like service
//!
//! Like/unlike a message with an emoji. Uniqueness of the
//! (user, message, emoji) tuple is enforced by lookup-before-create, not a
//! stored constraint. Unlike returns the deleted record so the caller can
//! publish it to the hub (the store no longer has it).

use agora_core::entities::{Like, LikeWithRelations};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::dto::LikeRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Like service
pub struct LikeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LikeService<'a> {
    /// Create a new LikeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Like a message
    ///
    /// Liking twice with the same emoji returns the existing like unchanged.
    #[instrument(skip(self, request), fields(message_id = %request.message_id))]
    pub async fn like(&self, user_id: Uuid, request: LikeRequest) -> ServiceResult<LikeWithRelations> {
        request.validate()?;

        if let Some(existing) = self
            .ctx
            .like_repo()
            .find_by_tuple(user_id, request.message_id, &request.emoji)
            .await?
        {
            return Ok(existing);
        }

        self.ctx
            .message_repo()
            .find_by_id(request.message_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", request.message_id.to_string()))?;

        let like = Like::new(Uuid::new_v4(), request.message_id, user_id, request.emoji);
        self.ctx.like_repo().create(&like).await?;

        info!(like_id = %like.id, message_id = %like.message_id, emoji = %like.emoji, "Like added");

        self.ctx
            .like_repo()
            .find_by_id_with_relations(like.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Like", like.id.to_string()))
    }

    /// Unlike a message
    ///
    /// Looks the like up by (user, message, emoji) and deletes it, returning
    /// the full deleted record.
    #[instrument(skip(self, request), fields(message_id = %request.message_id))]
    pub async fn unlike(
        &self,
        user_id: Uuid,
        request: LikeRequest,
    ) -> ServiceResult<LikeWithRelations> {
        request.validate()?;

        let existing = self
            .ctx
            .like_repo()
            .find_by_tuple(user_id, request.message_id, &request.emoji)
            .await?
            .ok_or_else(|| ServiceError::not_found("Like", request.message_id.to_string()))?;

        self.ctx.like_repo().delete(existing.like.id).await?;

        info!(like_id = %existing.like.id, message_id = %request.message_id, "Like removed");

        Ok(existing)
    }
}
