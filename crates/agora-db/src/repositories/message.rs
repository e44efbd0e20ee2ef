//! PostgreSQL implementation of MessageRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use agora_core::entities::{LikeWithUser, Message, MessageWithRelations};
use agora_core::traits::{MessageRepository, RepoResult};

use crate::models::{LikeWithUserRow, MessageModel, MessageWithAuthorRow};

use super::error::map_db_error;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch likes (with likers) for a set of messages, grouped by message id
    async fn likes_for_messages(
        &self,
        message_ids: &[Uuid],
    ) -> RepoResult<HashMap<Uuid, Vec<LikeWithUser>>> {
        if message_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, LikeWithUserRow>(
            r#"
            SELECT l.id, l.message_id, l.user_id, l.emoji, l.created_at,
                   u.username AS liker_username, u.avatar AS liker_avatar
            FROM likes l
            JOIN users u ON u.id = l.user_id
            WHERE l.message_id = ANY($1)
            ORDER BY l.created_at
            "#,
        )
        .bind(message_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut grouped: HashMap<Uuid, Vec<LikeWithUser>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.message_id)
                .or_default()
                .push(LikeWithUser::from(row));
        }
        Ok(grouped)
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, post_id, parent_id, user_id, text, created_at, updated_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_by_id_with_relations(&self, id: Uuid) -> RepoResult<Option<MessageWithRelations>> {
        let row = sqlx::query_as::<_, MessageWithAuthorRow>(
            r#"
            SELECT m.id, m.post_id, m.parent_id, m.user_id, m.text,
                   m.created_at, m.updated_at,
                   u.username AS author_username, u.avatar AS author_avatar
            FROM messages m
            JOIN users u ON u.id = m.user_id
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut enriched = row.into_message_with_relations();
        let mut likes = self.likes_for_messages(&[enriched.id()]).await?;
        if let Some(likes) = likes.remove(&enriched.id()) {
            enriched.likes = likes;
        }

        Ok(Some(enriched))
    }

    #[instrument(skip(self))]
    async fn find_by_post_with_relations(
        &self,
        post_id: Uuid,
    ) -> RepoResult<Vec<MessageWithRelations>> {
        let rows = sqlx::query_as::<_, MessageWithAuthorRow>(
            r#"
            SELECT m.id, m.post_id, m.parent_id, m.user_id, m.text,
                   m.created_at, m.updated_at,
                   u.username AS author_username, u.avatar AS author_avatar
            FROM messages m
            JOIN users u ON u.id = m.user_id
            WHERE m.post_id = $1
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut messages: Vec<MessageWithRelations> = rows
            .into_iter()
            .map(MessageWithAuthorRow::into_message_with_relations)
            .collect();

        let ids: Vec<Uuid> = messages.iter().map(MessageWithRelations::id).collect();
        let mut likes = self.likes_for_messages(&ids).await?;
        for message in &mut messages {
            if let Some(likes) = likes.remove(&message.id()) {
                message.likes = likes;
            }
        }

        Ok(messages)
    }

    #[instrument(skip(self))]
    async fn count_by_post(&self, post_id: Uuid) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE post_id = $1
            "#,
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self, message))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, post_id, parent_id, user_id, text, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id)
        .bind(message.post_id)
        .bind(message.parent_id)
        .bind(message.user_id)
        .bind(&message.text)
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn update_text(&self, id: Uuid, text: &str) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE messages
            SET text = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(text)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
