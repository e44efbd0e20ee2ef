//! Test helpers
//!
//! An in-process hub plus simulated clients. Clients talk to the hub through
//! the event dispatcher directly and receive broadcasts over the same mpsc
//! channel a real WebSocket send task would drain.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use agora_common::config::{AppConfig, AppSettings, DatabaseConfig, HubConfig, ServerConfig};
use agora_db::InMemoryStore;
use agora_hub::handlers::EventDispatcher;
use agora_hub::{ClientEvent, Connection, HubError, HubState, RoomRegistry, ServerEvent};
use agora_service::ServiceContext;
use agora_sync::{EventTransport, SyncEngine, SyncError};

/// Buffer for each simulated client's incoming events
const CLIENT_BUFFER: usize = 32;

/// Configuration for tests; the database url is never dialed
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings::default(),
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        hub: HubConfig::default(),
    }
}

/// An in-process hub over the in-memory store
pub struct TestHub {
    pub store: Arc<InMemoryStore>,
    pub state: HubState,
}

impl TestHub {
    /// Start a hub with a fresh store
    pub fn start() -> Self {
        let store = InMemoryStore::new_shared();
        let context = ServiceContext::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        );
        let state = HubState::new(context, RoomRegistry::new_shared(), test_config());

        Self { store, state }
    }

    /// The hub's service context, for driving write-path services
    pub fn context(&self) -> &ServiceContext {
        self.state.service_context()
    }

    /// Attach a simulated client
    pub fn connect(&self, name: &str) -> TestClient {
        let session_id = format!("{name}-{}", Uuid::new_v4());
        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        let connection = self.state.rooms().add_connection(session_id.clone(), tx);

        TestClient {
            session_id,
            connection,
            state: self.state.clone(),
            rx,
        }
    }
}

/// A simulated connected client
pub struct TestClient {
    pub session_id: String,
    pub connection: Arc<Connection>,
    state: HubState,
    rx: mpsc::Receiver<ServerEvent>,
}

impl TestClient {
    /// Send one event to the hub, as if over the socket
    pub async fn emit(&self, event: ClientEvent) -> Result<(), HubError> {
        EventDispatcher::dispatch(&self.state, &self.connection, event).await
    }

    /// Join a post's room
    pub async fn join(&self, post_id: Uuid) {
        self.emit(ClientEvent::JoinPage(post_id))
            .await
            .expect("join failed");
    }

    /// Wait for the next broadcast
    pub async fn recv(&mut self) -> ServerEvent {
        tokio::time::timeout(Duration::from_secs(1), self.rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("hub dropped the connection")
    }

    /// Take a pending broadcast without waiting
    pub fn try_recv(&mut self) -> Option<ServerEvent> {
        self.rx.try_recv().ok()
    }

    /// Assert nothing is pending for this client
    pub fn assert_silent(&mut self) {
        assert!(
            self.rx.try_recv().is_err(),
            "expected no event for {}",
            self.session_id
        );
    }

    /// A sync-engine transport that feeds this client's events into the hub
    pub fn transport(&self) -> Arc<DispatcherTransport> {
        Arc::new(DispatcherTransport {
            state: self.state.clone(),
            connection: self.connection.clone(),
        })
    }

    /// Merge every pending broadcast into an engine
    pub fn drain_into(&mut self, engine: &mut SyncEngine) {
        while let Some(event) = self.try_recv() {
            engine.handle_server_event(event);
        }
    }

    /// Simulate the transport dropping
    pub async fn disconnect(&self) {
        self.state
            .rooms()
            .remove_connection(&self.session_id)
            .await;
    }
}

/// Engine transport wired straight into the hub's dispatcher
pub struct DispatcherTransport {
    state: HubState,
    connection: Arc<Connection>,
}

#[async_trait]
impl EventTransport for DispatcherTransport {
    async fn send(&self, event: ClientEvent) -> Result<(), SyncError> {
        EventDispatcher::dispatch(&self.state, &self.connection, event)
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))
    }
}
