//! Message service
//!
//! Handles message creation and editing. The caller re-publishes the returned
//! entity's id to the event hub after a successful write; nothing here talks
//! to the hub directly.

use agora_core::entities::{Message, MessageWithRelations};
use agora_core::DomainError;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{CreateMessageRequest, EditMessageRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a message (top-level or reply)
    ///
    /// The parent, if given, must belong to the same post: the comment tree
    /// cannot span posts.
    #[instrument(skip(self, request), fields(post_id = %request.post_id))]
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateMessageRequest,
    ) -> ServiceResult<MessageWithRelations> {
        request.validate()?;

        self.ctx
            .post_repo()
            .find_by_id(request.post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", request.post_id.to_string()))?;

        if let Some(parent_id) = request.parent_id {
            let parent = self
                .ctx
                .message_repo()
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Message", parent_id.to_string()))?;

            if parent.post_id != request.post_id {
                return Err(DomainError::ParentOutsidePost { parent_id }.into());
            }
        }

        let message = match request.parent_id {
            Some(parent_id) => Message::new_reply(
                Uuid::new_v4(),
                request.post_id,
                user_id,
                request.text,
                parent_id,
            ),
            None => Message::new(Uuid::new_v4(), request.post_id, user_id, request.text),
        };

        self.ctx.message_repo().create(&message).await?;

        info!(message_id = %message.id, post_id = %message.post_id, "Message created");

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        Ok(MessageWithRelations::new(message, user))
    }

    /// Edit a message's text
    ///
    /// Only the original author may edit; anyone else gets a non-recoverable
    /// rejection.
    #[instrument(skip(self, request), fields(message_id = %request.message_id))]
    pub async fn edit(
        &self,
        user_id: Uuid,
        request: EditMessageRequest,
    ) -> ServiceResult<MessageWithRelations> {
        request.validate()?;

        let message = self
            .ctx
            .message_repo()
            .find_by_id(request.message_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", request.message_id.to_string()))?;

        if message.user_id != user_id {
            return Err(ServiceError::Forbidden("only the author may edit a message"));
        }

        self.ctx
            .message_repo()
            .update_text(request.message_id, &request.text)
            .await?;

        info!(message_id = %request.message_id, "Message edited");

        self.ctx
            .message_repo()
            .find_by_id_with_relations(request.message_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", request.message_id.to_string()))
    }
}
