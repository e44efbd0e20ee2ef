//! Synchronization engine errors

use thiserror::Error;

/// Errors from the client synchronization engine
#[derive(Debug, Error)]
pub enum SyncError {
    /// The outgoing event could not be handed to the transport
    #[error("Transport send failed: {0}")]
    Transport(String),

    /// JSON encode/decode failure on the wire
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// WebSocket-level failure in the driver
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
