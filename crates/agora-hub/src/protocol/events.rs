//! Wire event definitions
//!
//! All traffic is named JSON events in a `{"event": ..., "data": ...}`
//! envelope. Client-to-hub message/like events may carry the full entity; the
//! hub only trusts the id and re-fetches the rest (except `unlikePosted`,
//! whose record no longer exists in the store).

use agora_core::entities::{LikeWithRelations, MessageWithRelations};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to a message by id
///
/// Clients typically emit the full message they got back from their own
/// write; extra fields are ignored on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub id: Uuid,
}

/// Reference to a like by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeRef {
    pub id: Uuid,
}

/// Liveness/drift check payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingPayload {
    pub post_id: Uuid,
    pub number_of_messages_in_list: i64,
}

/// Events sent from a client to the hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Join the room for a post
    JoinPage(Uuid),
    /// Leave the room for a post
    LeavePage(Uuid),
    /// A message was written; the hub re-fetches and broadcasts it
    MessagePosted(MessageRef),
    /// A message was edited; the hub re-fetches and broadcasts it
    MessageEdited(MessageRef),
    /// A like was added; the hub re-fetches and broadcasts it
    LikePosted(LikeRef),
    /// A like was removed; carries the full already-deleted record
    UnlikePosted(LikeWithRelations),
    /// Liveness/drift check
    Ping(PingPayload),
}

impl ClientEvent {
    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get the wire name of this event
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::JoinPage(_) => "joinPage",
            Self::LeavePage(_) => "leavePage",
            Self::MessagePosted(_) => "messagePosted",
            Self::MessageEdited(_) => "messageEdited",
            Self::LikePosted(_) => "likePosted",
            Self::UnlikePosted(_) => "unlikePosted",
            Self::Ping(_) => "ping",
        }
    }
}

/// Events sent from the hub to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Connection acknowledgement, sent once on connect
    Confirmation(String),
    /// Enriched new message, fanned out to the post room
    MessagePosted(MessageWithRelations),
    /// Enriched edited message, fanned out to the post room
    MessageEdited(MessageWithRelations),
    /// Enriched new like, fanned out to the post room
    LikePosted(LikeWithRelations),
    /// Removed like, relayed as received
    UnlikePosted(LikeWithRelations),
    /// Drift detected; sent to the pinging connection only
    OutOfSync(bool),
}

impl ServerEvent {
    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get the wire name of this event
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Confirmation(_) => "confirmation",
            Self::MessagePosted(_) => "messagePosted",
            Self::MessageEdited(_) => "messageEdited",
            Self::LikePosted(_) => "likePosted",
            Self::UnlikePosted(_) => "unlikePosted",
            Self::OutOfSync(_) => "outOfSync",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::entities::{Message, User};

    #[test]
    fn test_join_page_wire_name() {
        let post_id = Uuid::new_v4();
        let event = ClientEvent::JoinPage(post_id);
        let json = event.to_json().unwrap();
        assert!(json.contains(r#""event":"joinPage""#));
        assert!(json.contains(&post_id.to_string()));
    }

    #[test]
    fn test_ping_payload_field_names() {
        let event = ClientEvent::Ping(PingPayload {
            post_id: Uuid::new_v4(),
            number_of_messages_in_list: 7,
        });
        let json = event.to_json().unwrap();
        assert!(json.contains(r#""event":"ping""#));
        assert!(json.contains(r#""numberOfMessagesInList":7"#));
        assert!(json.contains("postId"));
    }

    #[test]
    fn test_message_ref_ignores_extra_fields() {
        // Clients send the full message back; the hub keeps only the id
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"event":"messagePosted","data":{{"id":"{id}","text":"hi","postId":"{}"}}}}"#,
            Uuid::new_v4()
        );
        let event = ClientEvent::from_json(&json).unwrap();
        assert_eq!(event, ClientEvent::MessagePosted(MessageRef { id }));
    }

    #[test]
    fn test_out_of_sync_roundtrip() {
        let event = ServerEvent::OutOfSync(true);
        let json = event.to_json().unwrap();
        assert!(json.contains(r#""event":"outOfSync""#));
        let parsed = ServerEvent::from_json(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_server_message_posted_roundtrip() {
        let author = User::new(Uuid::new_v4(), "ada".to_string());
        let message = Message::new(Uuid::new_v4(), Uuid::new_v4(), author.id, "hi".to_string());
        let event = ServerEvent::MessagePosted(MessageWithRelations::new(message, author));

        let json = event.to_json().unwrap();
        assert!(json.contains(r#""event":"messagePosted""#));
        assert!(json.contains(r#""likes":[]"#));

        let parsed = ServerEvent::from_json(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(ClientEvent::JoinPage(Uuid::new_v4()).name(), "joinPage");
        assert_eq!(ServerEvent::OutOfSync(true).name(), "outOfSync");
        assert_eq!(
            ServerEvent::Confirmation("connected!".to_string()).name(),
            "confirmation"
        );
    }

    #[test]
    fn test_unknown_event_rejected() {
        let json = r#"{"event":"presenceUpdate","data":{}}"#;
        assert!(ClientEvent::from_json(json).is_err());
    }
}
