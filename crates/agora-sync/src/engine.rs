//! Synchronization engine
//!
//! Owns one tab's cache, room membership, and reconcile schedule. The
//! transport is optional: with none (the socket never came up) the engine
//! runs read-only-at-load, merging nothing and sending nothing, without
//! erroring anywhere.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use agora_core::entities::{LikeWithRelations, MessageWithRelations};
use agora_hub::{ClientEvent, ServerEvent};
use agora_hub::protocol::{LikeRef, MessageRef, PingPayload};

use crate::cache::MessageCache;
use crate::error::SyncError;
use crate::reconcile::{ReconcileSchedule, SyncHealth};
use crate::transport::EventTransport;
use crate::tree::{derive_tree, CommentNode};

/// Sticky banner text shown once reconciliation gives up
pub const DESYNC_WARNING: &str = "Connection lost, please refresh the page.";

/// Connection lifecycle of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No transport yet
    Disconnected,
    /// Transport attached, join not yet acknowledged locally
    Connecting,
    /// Member of the post's room
    Joined,
    /// Drift persisted; only a page reload recovers
    Desynced,
}

/// Per-tab synchronization engine for one post
pub struct SyncEngine {
    post_id: Uuid,
    state: EngineState,
    cache: MessageCache,
    schedule: ReconcileSchedule,
    transport: Option<Arc<dyn EventTransport>>,
    warning: Option<&'static str>,
}

impl SyncEngine {
    /// Create an engine seeded with the page-load snapshot
    #[must_use]
    pub fn new(post_id: Uuid, snapshot: Vec<MessageWithRelations>) -> Self {
        Self {
            post_id,
            state: EngineState::Disconnected,
            cache: MessageCache::from_snapshot(post_id, snapshot),
            schedule: ReconcileSchedule::new(),
            transport: None,
            warning: None,
        }
    }

    /// The post this engine tracks
    #[inline]
    pub fn post_id(&self) -> Uuid {
        self.post_id
    }

    /// Current lifecycle state
    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Current sync health
    #[inline]
    pub fn health(&self) -> SyncHealth {
        self.schedule.health()
    }

    /// The sticky user-visible warning, if reconciliation has given up
    #[inline]
    pub fn warning(&self) -> Option<&'static str> {
        self.warning
    }

    /// The local cache
    #[inline]
    pub fn cache(&self) -> &MessageCache {
        &self.cache
    }

    /// Time until the next reconcile, or `None` once given up
    pub fn reconcile_interval(&self) -> Option<Duration> {
        self.schedule.interval()
    }

    /// Derive the displayed comment forest
    #[must_use]
    pub fn tree(&self) -> Vec<CommentNode> {
        derive_tree(&self.cache)
    }

    /// Attach a transport and join the post's room
    ///
    /// # Errors
    /// Returns an error if the join could not be sent; the engine stays
    /// `Connecting` and a later `on_reconnected` can retry.
    pub async fn connect(&mut self, transport: Arc<dyn EventTransport>) -> Result<(), SyncError> {
        self.state = EngineState::Connecting;
        self.transport = Some(transport);

        self.send(ClientEvent::JoinPage(self.post_id)).await?;

        self.state = EngineState::Joined;
        info!(post_id = %self.post_id, "Joined post room");
        Ok(())
    }

    /// Re-join after a transport-level reconnect
    ///
    /// The hub dropped our room membership with the old connection; joining
    /// again is idempotent on its side. A desynced engine stays desynced.
    ///
    /// # Errors
    /// Returns an error if the join could not be sent.
    pub async fn on_reconnected(&mut self) -> Result<(), SyncError> {
        if self.transport.is_none() {
            return Ok(());
        }

        self.send(ClientEvent::JoinPage(self.post_id)).await?;

        if self.state != EngineState::Desynced {
            self.state = EngineState::Joined;
        }
        debug!(post_id = %self.post_id, "Re-joined post room after reconnect");
        Ok(())
    }

    /// Leave the post's room (navigation away)
    ///
    /// # Errors
    /// Returns an error if the leave could not be sent.
    pub async fn leave(&mut self) -> Result<(), SyncError> {
        if self.transport.is_some() {
            self.send(ClientEvent::LeavePage(self.post_id)).await?;
        }
        self.state = EngineState::Disconnected;
        self.transport = None;
        Ok(())
    }

    /// Merge the response of this tab's own successful write
    ///
    /// The hub excludes the sender from fan-out, so the write response is the
    /// only copy this tab gets. Idempotent against a racing self-broadcast.
    pub fn apply_own_write(&mut self, message: MessageWithRelations) {
        self.cache.apply_message_posted(message);
    }

    /// Merge one broadcast event into the cache
    pub fn handle_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Confirmation(text) => {
                debug!(post_id = %self.post_id, text = %text, "Hub confirmed connection");
            }
            ServerEvent::MessagePosted(message) => {
                self.cache.apply_message_posted(message);
            }
            ServerEvent::MessageEdited(message) => {
                self.cache.apply_message_edited(&message);
            }
            ServerEvent::LikePosted(like) => {
                let message_id = like.like.message_id;
                self.cache
                    .apply_like_added(message_id, like.into_like_with_user());
            }
            ServerEvent::UnlikePosted(like) => {
                self.cache
                    .apply_like_removed(like.like.message_id, like.like.id);
            }
            ServerEvent::OutOfSync(true) => self.on_drift(),
            ServerEvent::OutOfSync(false) => {}
        }
    }

    /// Run one drift check
    ///
    /// Sends the local message count; the hub answers only on disagreement.
    /// A no-op when not joined, desynced, or never connected.
    ///
    /// # Errors
    /// Returns an error if the ping could not be sent.
    pub async fn reconcile(&mut self) -> Result<(), SyncError> {
        if self.state != EngineState::Joined || self.schedule.is_desynced() {
            return Ok(());
        }
        if self.transport.is_none() {
            return Ok(());
        }

        let count = i64::try_from(self.cache.len()).unwrap_or(i64::MAX);
        self.send(ClientEvent::Ping(PingPayload {
            post_id: self.post_id,
            number_of_messages_in_list: count,
        }))
        .await
    }

    /// Publish a freshly written message's id for enrichment and fan-out
    ///
    /// # Errors
    /// Returns an error if the event could not be sent.
    pub async fn announce_message_posted(&self, message_id: Uuid) -> Result<(), SyncError> {
        self.send(ClientEvent::MessagePosted(MessageRef { id: message_id }))
            .await
    }

    /// Publish an edited message's id
    ///
    /// # Errors
    /// Returns an error if the event could not be sent.
    pub async fn announce_message_edited(&self, message_id: Uuid) -> Result<(), SyncError> {
        self.send(ClientEvent::MessageEdited(MessageRef { id: message_id }))
            .await
    }

    /// Publish a new like's id
    ///
    /// # Errors
    /// Returns an error if the event could not be sent.
    pub async fn announce_like_added(&self, like_id: Uuid) -> Result<(), SyncError> {
        self.send(ClientEvent::LikePosted(LikeRef { id: like_id }))
            .await
    }

    /// Publish a removed like, carrying the full already-deleted record
    ///
    /// # Errors
    /// Returns an error if the event could not be sent.
    pub async fn announce_like_removed(&self, like: LikeWithRelations) -> Result<(), SyncError> {
        self.send(ClientEvent::UnlikePosted(like)).await
    }

    fn on_drift(&mut self) {
        let health = self.schedule.on_drift();
        warn!(post_id = %self.post_id, health = ?health, "Drift detected");

        if self.schedule.is_desynced() {
            self.state = EngineState::Desynced;
            self.warning = Some(DESYNC_WARNING);
            warn!(post_id = %self.post_id, "Giving up on reconciliation");
        }
    }

    /// Send through the transport; silently a no-op when never connected
    async fn send(&self, event: ClientEvent) -> Result<(), SyncError> {
        match &self.transport {
            Some(transport) => transport.send(event).await,
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("post_id", &self.post_id)
            .field("state", &self.state)
            .field("cached", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::entities::{Like, Message, User};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records everything the engine sends
    struct RecordingTransport {
        sent: Mutex<Vec<ClientEvent>>,
    }

    impl RecordingTransport {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<ClientEvent> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventTransport for RecordingTransport {
        async fn send(&self, event: ClientEvent) -> Result<(), SyncError> {
            self.sent.lock().unwrap().push(event);
            Ok(())
        }
    }

    fn enriched(post_id: Uuid, text: &str) -> MessageWithRelations {
        let author = User::new(Uuid::new_v4(), "ada".to_string());
        let message = Message::new(Uuid::new_v4(), post_id, author.id, text.to_string());
        MessageWithRelations::new(message, author)
    }

    fn full_like(message: &Message) -> LikeWithRelations {
        let user = User::new(Uuid::new_v4(), "bob".to_string());
        let like = Like::new(Uuid::new_v4(), message.id, user.id, "👍".to_string());
        LikeWithRelations::new(like, user, message.clone())
    }

    #[tokio::test]
    async fn test_connect_joins_room() {
        let post_id = Uuid::new_v4();
        let mut engine = SyncEngine::new(post_id, Vec::new());
        assert_eq!(engine.state(), EngineState::Disconnected);

        let transport = RecordingTransport::new();
        engine.connect(transport.clone()).await.unwrap();

        assert_eq!(engine.state(), EngineState::Joined);
        assert_eq!(transport.sent(), vec![ClientEvent::JoinPage(post_id)]);
    }

    #[tokio::test]
    async fn test_reconnect_rejoins_room() {
        let post_id = Uuid::new_v4();
        let mut engine = SyncEngine::new(post_id, Vec::new());
        let transport = RecordingTransport::new();
        engine.connect(transport.clone()).await.unwrap();

        engine.on_reconnected().await.unwrap();

        assert_eq!(engine.state(), EngineState::Joined);
        assert_eq!(
            transport.sent(),
            vec![
                ClientEvent::JoinPage(post_id),
                ClientEvent::JoinPage(post_id)
            ]
        );
    }

    #[tokio::test]
    async fn test_reconcile_sends_local_count() {
        let post_id = Uuid::new_v4();
        let snapshot = vec![enriched(post_id, "a"), enriched(post_id, "b")];
        let mut engine = SyncEngine::new(post_id, snapshot);
        let transport = RecordingTransport::new();
        engine.connect(transport.clone()).await.unwrap();

        engine.reconcile().await.unwrap();

        let last = transport.sent().pop().unwrap();
        assert_eq!(
            last,
            ClientEvent::Ping(PingPayload {
                post_id,
                number_of_messages_in_list: 2,
            })
        );
    }

    #[tokio::test]
    async fn test_three_drifts_desync_with_sticky_warning() {
        let post_id = Uuid::new_v4();
        let mut engine = SyncEngine::new(post_id, Vec::new());
        let transport = RecordingTransport::new();
        engine.connect(transport.clone()).await.unwrap();

        engine.handle_server_event(ServerEvent::OutOfSync(true));
        assert_eq!(engine.state(), EngineState::Joined);
        assert_eq!(engine.reconcile_interval(), Some(Duration::from_secs(10)));
        assert!(engine.warning().is_none());

        engine.handle_server_event(ServerEvent::OutOfSync(true));
        engine.handle_server_event(ServerEvent::OutOfSync(true));

        assert_eq!(engine.state(), EngineState::Desynced);
        assert_eq!(engine.reconcile_interval(), None);
        assert_eq!(engine.warning(), Some(DESYNC_WARNING));

        // Desynced engines stop pinging entirely
        let before = transport.sent().len();
        engine.reconcile().await.unwrap();
        assert_eq!(transport.sent().len(), before);
    }

    #[tokio::test]
    async fn test_never_connected_engine_degrades_quietly() {
        let post_id = Uuid::new_v4();
        let snapshot = vec![enriched(post_id, "only")];
        let mut engine = SyncEngine::new(post_id, snapshot);

        // Merge and outbound operations all tolerate the missing transport
        engine.handle_server_event(ServerEvent::MessagePosted(enriched(post_id, "late")));
        engine.reconcile().await.unwrap();
        engine.announce_message_posted(Uuid::new_v4()).await.unwrap();
        engine.leave().await.unwrap();

        assert_eq!(engine.state(), EngineState::Disconnected);
        assert_eq!(engine.tree().len(), 2);
    }

    #[tokio::test]
    async fn test_like_events_round_trip_through_cache() {
        let post_id = Uuid::new_v4();
        let message = enriched(post_id, "likeable");
        let message_id = message.id();
        let mut engine = SyncEngine::new(post_id, vec![message.clone()]);

        let like = full_like(&message.message);
        engine.handle_server_event(ServerEvent::LikePosted(like.clone()));
        assert_eq!(engine.cache().get(message_id).unwrap().likes.len(), 1);

        engine.handle_server_event(ServerEvent::UnlikePosted(like));
        assert!(engine.cache().get(message_id).unwrap().likes.is_empty());
    }
}
