//! Request DTOs with validation rules

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create a new message (top-level or reply)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub post_id: Uuid,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Message is required"))]
    pub text: String,
}

/// Edit an existing message's text
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditMessageRequest {
    pub message_id: Uuid,
    #[validate(length(min = 1, message = "Message is required"))]
    pub text: String,
}

/// Like or unlike a message with an emoji
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub message_id: Uuid,
    #[validate(length(min = 1, max = 32, message = "Emoji is required"))]
    pub emoji: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_rejected() {
        let req = CreateMessageRequest {
            post_id: Uuid::new_v4(),
            parent_id: None,
            text: String::new(),
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("text"));
    }

    #[test]
    fn test_valid_request_passes() {
        let req = CreateMessageRequest {
            post_id: Uuid::new_v4(),
            parent_id: Some(Uuid::new_v4()),
            text: "hello".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_emoji_bounds() {
        let req = LikeRequest {
            message_id: Uuid::new_v4(),
            emoji: String::new(),
        };
        assert!(req.validate().is_err());

        let req = LikeRequest {
            message_id: Uuid::new_v4(),
            emoji: "👍".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
