//! Hub error types

use agora_core::DomainError;

/// Event hub errors
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("Connection closed")]
    ConnectionClosed,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl HubError {
    /// Whether the client connection should be closed over this error
    ///
    /// Only a dead outgoing channel warrants a close; everything else drops
    /// the event and keeps the connection.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConnectionClosed)
    }
}
