//! Enrichment and fan-out

mod enrich;

pub use enrich::{
    broadcast_unlike, enrich_and_broadcast_like, enrich_and_broadcast_message, BroadcastOutcome,
};
