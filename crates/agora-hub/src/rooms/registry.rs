//! Room registry
//!
//! Tracks all active connections and their per-post room membership using
//! DashMap for thread-safe access. Rooms come into existence implicitly when
//! the first member joins and are removed when the last member leaves.

use super::Connection;
use crate::protocol::ServerEvent;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Manages all active connections and room membership
pub struct RoomRegistry {
    /// Active connections by session ID
    connections: DashMap<String, Arc<Connection>>,

    /// Post ID to session IDs mapping
    rooms: DashMap<Uuid, HashSet<String>>,
}

impl RoomRegistry {
    /// Create a new room registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    /// Create a new registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection
    pub fn add_connection(
        &self,
        session_id: String,
        sender: mpsc::Sender<ServerEvent>,
    ) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), sender);
        self.connections.insert(session_id.clone(), connection.clone());

        tracing::debug!(session_id = %session_id, "Connection added");

        connection
    }

    /// Remove a connection and drop it from every room it was in
    ///
    /// Uses `alter`/`retain` for atomic modify-and-cleanup to avoid TOCTOU
    /// races between concurrent disconnects.
    pub async fn remove_connection(&self, session_id: &str) {
        if let Some((_, connection)) = self.connections.remove(session_id) {
            for post_id in connection.rooms().await {
                self.rooms.alter(&post_id, |_, mut sessions| {
                    sessions.remove(session_id);
                    sessions
                });
            }

            // Clean up all empty rooms atomically
            self.rooms.retain(|_, sessions| !sessions.is_empty());

            tracing::debug!(session_id = %session_id, "Connection removed");
        }
    }

    /// Get a connection by session ID
    pub fn get_connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// Join a connection to a post's room
    ///
    /// Idempotent: joining a room twice (e.g. a re-join after a transport
    /// reconnect) is a no-op. Invalid post ids are harmless; the room simply
    /// never receives a broadcast.
    pub async fn join(&self, session_id: &str, post_id: Uuid) -> bool {
        if let Some(connection) = self.connections.get(session_id) {
            connection.track_room(post_id).await;

            self.rooms
                .entry(post_id)
                .or_default()
                .insert(session_id.to_string());

            tracing::trace!(session_id = %session_id, post_id = %post_id, "Joined room");

            true
        } else {
            false
        }
    }

    /// Remove a connection from a post's room
    pub async fn leave(&self, session_id: &str, post_id: Uuid) -> bool {
        if let Some(connection) = self.connections.get(session_id) {
            connection.untrack_room(post_id).await;

            self.rooms.alter(&post_id, |_, mut sessions| {
                sessions.remove(session_id);
                sessions
            });
            self.rooms.retain(|_, sessions| !sessions.is_empty());

            tracing::trace!(session_id = %session_id, post_id = %post_id, "Left room");

            true
        } else {
            false
        }
    }

    /// Get all connections in a post's room
    pub fn room_connections(&self, post_id: Uuid) -> Vec<Arc<Connection>> {
        self.rooms
            .get(&post_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.connections.get(sid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Send an event to every member of a room, excluding one session
    ///
    /// The excluded session is the original sender: it already holds
    /// authoritative local state from its own write response.
    pub async fn send_to_room(
        &self,
        post_id: Uuid,
        event: ServerEvent,
        exclude_session: Option<&str>,
    ) -> usize {
        let connections = self.room_connections(post_id);
        let mut sent = 0;

        for conn in connections {
            if let Some(exclude) = exclude_session {
                if conn.session_id() == exclude {
                    continue;
                }
            }

            if conn.send(event.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(
            post_id = %post_id,
            event = event.name(),
            sent = sent,
            "Event sent to room"
        );

        sent
    }

    /// Total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of rooms with at least one member
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of members in a room
    pub fn member_count(&self, post_id: Uuid) -> usize {
        self.rooms.get(&post_id).map_or(0, |s| s.len())
    }

    /// Check if a session exists
    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }

    /// Clean up connections whose outgoing channel has closed
    pub async fn cleanup_closed_connections(&self) -> usize {
        let closed: Vec<String> = self
            .connections
            .iter()
            .filter(|r| r.is_closed())
            .map(|r| r.key().clone())
            .collect();

        let count = closed.len();

        for session_id in closed {
            self.remove_connection(&session_id).await;
        }

        if count > 0 {
            tracing::info!(count = count, "Cleaned up closed connections");
        }

        count
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RoomRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomRegistry")
            .field("connections", &self.connections.len())
            .field("rooms", &self.rooms.len())
            .finish()
    }
}
