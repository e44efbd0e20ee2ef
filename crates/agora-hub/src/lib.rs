//! # agora-hub
//!
//! The event hub: a process-wide broker that groups WebSocket connections
//! into per-post rooms and relays domain events between them. Bare entity
//! references arriving from clients are enriched (re-fetched with relations)
//! before fan-out; the sender is always excluded from its own broadcast.
//!
//! The hub is a liveness/notification channel, not the system of record:
//! events referencing missing entities are silently dropped, and nothing is
//! retried.

pub mod broadcast;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod rooms;
pub mod server;

pub use error::HubError;
pub use protocol::{ClientEvent, ServerEvent};
pub use rooms::{Connection, RoomRegistry};
pub use server::{create_app, create_hub_state, run, HubState};
