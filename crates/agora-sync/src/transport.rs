//! Outgoing transport port
//!
//! The engine only ever hands `ClientEvent`s to this trait; the WebSocket
//! driver implements it over an mpsc channel, and tests substitute a
//! recording stub.

use async_trait::async_trait;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use agora_hub::ClientEvent;

use crate::error::SyncError;

/// Sink for events headed to the hub
#[async_trait]
pub trait EventTransport: Send + Sync {
    /// Send one event to the hub
    ///
    /// # Errors
    /// Returns an error if the transport has shut down.
    async fn send(&self, event: ClientEvent) -> Result<(), SyncError>;
}

/// Transport over an in-process channel, used by the driver and by tests
///
/// Sends never block: the driver consumes the other end of this channel
/// from the same select loop that triggers reconcile pings, so a blocking
/// send from inside a handler could wait on itself. When the buffer is
/// full the event is dropped instead; a missed ping or announcement is
/// recovered by the next reconcile cycle.
pub struct ChannelTransport {
    tx: tokio::sync::mpsc::Sender<ClientEvent>,
}

impl ChannelTransport {
    pub fn new(tx: tokio::sync::mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventTransport for ChannelTransport {
    async fn send(&self, event: ClientEvent) -> Result<(), SyncError> {
        match self.tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!("outgoing buffer full, dropping event");
                Ok(())
            }
            Err(TrySendError::Closed(_)) => {
                Err(SyncError::Transport("outgoing channel closed".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_hub::protocol::PingPayload;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    fn ping() -> ClientEvent {
        ClientEvent::Ping(PingPayload {
            post_id: Uuid::new_v4(),
            number_of_messages_in_list: 0,
        })
    }

    #[tokio::test]
    async fn test_send_delivers_to_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let transport = ChannelTransport::new(tx);

        transport.send(ping()).await.unwrap();

        assert!(matches!(rx.recv().await, Some(ClientEvent::Ping(_))));
    }

    #[tokio::test]
    async fn test_full_buffer_drops_instead_of_blocking() {
        let (tx, mut rx) = mpsc::channel(1);
        let transport = ChannelTransport::new(tx);

        // Nobody is draining the channel, so the second send finds it
        // full. It must return immediately rather than wait for room.
        transport.send(ping()).await.unwrap();
        transport.send(ping()).await.unwrap();

        assert!(matches!(rx.recv().await, Some(ClientEvent::Ping(_))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_channel_errors() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let transport = ChannelTransport::new(tx);

        let result = transport.send(ping()).await;

        assert!(matches!(result, Err(SyncError::Transport(_))));
    }
}
