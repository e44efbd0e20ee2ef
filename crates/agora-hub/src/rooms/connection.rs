//! Individual WebSocket connection

use crate::protocol::ServerEvent;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// A single WebSocket connection
///
/// Holds the outgoing event channel and the set of post rooms the connection
/// currently belongs to. Room membership is owned by the connection's
/// lifetime: disconnect drops it all.
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Channel to send events to the WebSocket
    sender: mpsc::Sender<ServerEvent>,

    /// Post rooms this connection has joined
    rooms: RwLock<HashSet<Uuid>>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(session_id: String, sender: mpsc::Sender<ServerEvent>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            sender,
            rooms: RwLock::new(HashSet::new()),
            created_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send an event to this connection
    pub async fn send(&self, event: ServerEvent) -> Result<(), crate::HubError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| crate::HubError::ConnectionClosed)
    }

    /// Check if the outgoing channel has been closed
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Track room membership (idempotent)
    pub async fn track_room(&self, post_id: Uuid) {
        self.rooms.write().await.insert(post_id);
    }

    /// Drop room membership
    pub async fn untrack_room(&self, post_id: Uuid) {
        self.rooms.write().await.remove(&post_id);
    }

    /// All rooms this connection is a member of
    pub async fn rooms(&self) -> Vec<Uuid> {
        self.rooms.read().await.iter().copied().collect()
    }

    /// Check membership in a room
    pub async fn is_in_room(&self, post_id: Uuid) -> bool {
        self.rooms.read().await.contains(&post_id)
    }

    /// How long this connection has been open
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_room_tracking_is_idempotent() {
        let (tx, _rx) = mpsc::channel(8);
        let conn = Connection::new("s1".to_string(), tx);

        let post_id = Uuid::new_v4();
        conn.track_room(post_id).await;
        conn.track_room(post_id).await;

        assert!(conn.is_in_room(post_id).await);
        assert_eq!(conn.rooms().await.len(), 1);

        conn.untrack_room(post_id).await;
        assert!(!conn.is_in_room(post_id).await);
    }

    #[tokio::test]
    async fn test_send_fails_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel(8);
        let conn = Connection::new("s1".to_string(), tx);
        drop(rx);

        assert!(conn.is_closed());
        let result = conn.send(ServerEvent::OutOfSync(true)).await;
        assert!(result.is_err());
    }
}
