//! Integration test utilities for the forum synchronization layer
//!
//! Drives the event hub in-process: simulated clients attach over mpsc
//! channels instead of real WebSockets, with the in-memory store standing in
//! for PostgreSQL.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
