//! PostgreSQL implementation of LikeRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use agora_core::entities::{Like, LikeWithRelations, Message, User};
use agora_core::traits::{LikeRepository, RepoResult};

use super::error::map_db_error;

/// Joined row: a like with its user's and owning message's columns
#[derive(Debug, Clone, sqlx::FromRow)]
struct LikeFullRow {
    id: Uuid,
    message_id: Uuid,
    user_id: Uuid,
    emoji: String,
    created_at: chrono::DateTime<chrono::Utc>,
    liker_username: String,
    liker_avatar: Option<String>,
    m_id: Uuid,
    m_post_id: Uuid,
    m_parent_id: Option<Uuid>,
    m_user_id: Uuid,
    m_text: String,
    m_created_at: chrono::DateTime<chrono::Utc>,
    m_updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<LikeFullRow> for LikeWithRelations {
    fn from(row: LikeFullRow) -> Self {
        LikeWithRelations::new(
            Like {
                id: row.id,
                message_id: row.message_id,
                user_id: row.user_id,
                emoji: row.emoji,
                created_at: row.created_at,
            },
            User {
                id: row.user_id,
                username: row.liker_username,
                avatar: row.liker_avatar,
            },
            Message {
                id: row.m_id,
                post_id: row.m_post_id,
                parent_id: row.m_parent_id,
                user_id: row.m_user_id,
                text: row.m_text,
                created_at: row.m_created_at,
                updated_at: row.m_updated_at,
            },
        )
    }
}

const LIKE_FULL_SELECT: &str = r#"
    SELECT l.id, l.message_id, l.user_id, l.emoji, l.created_at,
           u.username AS liker_username, u.avatar AS liker_avatar,
           m.id AS m_id, m.post_id AS m_post_id, m.parent_id AS m_parent_id,
           m.user_id AS m_user_id, m.text AS m_text,
           m.created_at AS m_created_at, m.updated_at AS m_updated_at
    FROM likes l
    JOIN users u ON u.id = l.user_id
    JOIN messages m ON m.id = l.message_id
"#;

/// PostgreSQL implementation of LikeRepository
#[derive(Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    /// Create a new PgLikeRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    #[instrument(skip(self))]
    async fn find_by_id_with_relations(&self, id: Uuid) -> RepoResult<Option<LikeWithRelations>> {
        let query = format!("{LIKE_FULL_SELECT} WHERE l.id = $1");
        let row = sqlx::query_as::<_, LikeFullRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(LikeWithRelations::from))
    }

    #[instrument(skip(self))]
    async fn find_by_tuple(
        &self,
        user_id: Uuid,
        message_id: Uuid,
        emoji: &str,
    ) -> RepoResult<Option<LikeWithRelations>> {
        let query =
            format!("{LIKE_FULL_SELECT} WHERE l.user_id = $1 AND l.message_id = $2 AND l.emoji = $3");
        let row = sqlx::query_as::<_, LikeFullRow>(&query)
            .bind(user_id)
            .bind(message_id)
            .bind(emoji)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(LikeWithRelations::from))
    }

    #[instrument(skip(self, like))]
    async fn create(&self, like: &Like) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO likes (id, message_id, user_id, emoji, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(like.id)
        .bind(like.message_id)
        .bind(like.user_id)
        .bind(&like.emoji)
        .bind(like.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM likes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
