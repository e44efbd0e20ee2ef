//! Wire protocol

mod events;

pub use events::{ClientEvent, LikeRef, MessageRef, PingPayload, ServerEvent};
