//! # agora-sync
//!
//! Per-tab client synchronization engine. Keeps a local ordered, tree-shaped
//! cache of one post's comments eventually consistent with the server by
//! merging broadcast events idempotently, and detects drift with a periodic
//! count check whose interval shortens toward giving up.
//!
//! The engine tolerates never having connected at all: with no transport the
//! initial snapshot stays displayed read-only and every operation degrades to
//! a local no-op instead of erroring.

pub mod cache;
pub mod driver;
pub mod engine;
pub mod error;
pub mod reconcile;
pub mod transport;
pub mod tree;

pub use cache::MessageCache;
pub use driver::SyncDriver;
pub use engine::{EngineState, SyncEngine, DESYNC_WARNING};
pub use error::SyncError;
pub use reconcile::{ReconcileSchedule, SyncHealth};
pub use transport::{ChannelTransport, EventTransport};
pub use tree::{derive_tree, CommentNode, MAX_REPLY_DEPTH};
