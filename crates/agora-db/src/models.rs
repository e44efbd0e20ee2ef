//! Database models with SQLx `FromRow` derives and entity mappers

use agora_core::entities::{Like, LikeWithUser, Message, MessageWithRelations, Post, User};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: Uuid,
    pub username: String,
    pub avatar: Option<String>,
}

impl From<UserModel> for User {
    fn from(m: UserModel) -> Self {
        User {
            id: m.id,
            username: m.username,
            avatar: m.avatar,
        }
    }
}

/// Database model for the posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: Uuid,
    pub title: String,
    pub image: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<PostModel> for Post {
    fn from(m: PostModel) -> Self {
        Post {
            id: m.id,
            title: m.title,
            image: m.image,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }
}

/// Database model for the messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MessageModel> for Message {
    fn from(m: MessageModel) -> Self {
        Message {
            id: m.id,
            post_id: m.post_id,
            parent_id: m.parent_id,
            user_id: m.user_id,
            text: m.text,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Database model for the likes table
#[derive(Debug, Clone, FromRow)]
pub struct LikeModel {
    pub id: Uuid,
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

impl From<LikeModel> for Like {
    fn from(m: LikeModel) -> Self {
        Like {
            id: m.id,
            message_id: m.message_id,
            user_id: m.user_id,
            emoji: m.emoji,
            created_at: m.created_at,
        }
    }
}

/// Joined row: a message with its author's columns
#[derive(Debug, Clone, FromRow)]
pub struct MessageWithAuthorRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_username: String,
    pub author_avatar: Option<String>,
}

impl MessageWithAuthorRow {
    /// Build an enriched message with an empty likes list; the caller
    /// attaches likes afterwards.
    pub fn into_message_with_relations(self) -> MessageWithRelations {
        let user = User {
            id: self.user_id,
            username: self.author_username,
            avatar: self.author_avatar,
        };
        let message = Message {
            id: self.id,
            post_id: self.post_id,
            parent_id: self.parent_id,
            user_id: self.user_id,
            text: self.text,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        MessageWithRelations::new(message, user)
    }
}

/// Joined row: a like with its user's columns
#[derive(Debug, Clone, FromRow)]
pub struct LikeWithUserRow {
    pub id: Uuid,
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
    pub liker_username: String,
    pub liker_avatar: Option<String>,
}

impl From<LikeWithUserRow> for LikeWithUser {
    fn from(row: LikeWithUserRow) -> Self {
        LikeWithUser::new(
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
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_row_mapping() {
        let now = Utc::now();
        let row = MessageWithAuthorRow {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            parent_id: None,
            user_id: Uuid::new_v4(),
            text: "hello".to_string(),
            created_at: now,
            updated_at: now,
            author_username: "ada".to_string(),
            author_avatar: None,
        };
        let enriched = row.clone().into_message_with_relations();
        assert_eq!(enriched.user.id, row.user_id);
        assert_eq!(enriched.message.text, "hello");
        assert!(enriched.likes.is_empty());
    }
}
