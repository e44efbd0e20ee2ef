//! WebSocket driver
//!
//! Runs one tab's connection to the hub: forwards outgoing events from the
//! engine, merges incoming broadcasts, ticks the reconcile timer, and
//! re-joins the room after transport reconnects. If the socket never comes
//! up at all the driver returns and the engine stays in read-only-at-load
//! mode with the snapshot it already has.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use agora_hub::{ClientEvent, ServerEvent};

use crate::engine::SyncEngine;
use crate::error::SyncError;
use crate::transport::ChannelTransport;

/// Delay between reconnect attempts
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Outgoing channel depth between engine and socket
const OUTGOING_BUFFER: usize = 32;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Drives a shared engine over a WebSocket connection to the hub
pub struct SyncDriver {
    engine: Arc<Mutex<SyncEngine>>,
    url: String,
}

impl SyncDriver {
    /// Create a driver for an engine and hub URL (e.g. `ws://host:4000/socket`)
    pub fn new(engine: Arc<Mutex<SyncEngine>>, url: impl Into<String>) -> Self {
        Self {
            engine,
            url: url.into(),
        }
    }

    /// Run until the engine leaves, gives up, or the first connect fails
    ///
    /// An initial connection failure is not an error: the engine simply never
    /// attaches a transport and the page keeps its load-time snapshot.
    ///
    /// # Errors
    /// Returns an error on a wire codec failure.
    pub async fn run(self) -> Result<(), SyncError> {
        let (tx, mut rx) = mpsc::channel::<ClientEvent>(OUTGOING_BUFFER);
        let transport = Arc::new(ChannelTransport::new(tx));

        let mut connected_before = false;

        loop {
            let stream = match connect_async(self.url.as_str()).await {
                Ok((stream, _)) => stream,
                Err(e) if !connected_before => {
                    warn!(url = %self.url, error = %e, "Hub unreachable, staying read-only");
                    return Ok(());
                }
                Err(e) => {
                    debug!(url = %self.url, error = %e, "Reconnect attempt failed");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    continue;
                }
            };

            {
                let mut engine = self.engine.lock().await;
                if connected_before {
                    engine.on_reconnected().await?;
                } else {
                    engine.connect(transport.clone()).await?;
                    connected_before = true;
                }
            }

            info!(url = %self.url, "Connected to hub");

            self.drive(stream, &mut rx).await?;

            // Socket dropped; a desynced engine has nothing left to do
            if self.engine.lock().await.reconcile_interval().is_none() {
                info!(url = %self.url, "Reconciliation gave up, stopping driver");
                return Ok(());
            }

            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    /// Pump one socket until it closes
    async fn drive(
        &self,
        stream: WsStream,
        outgoing: &mut mpsc::Receiver<ClientEvent>,
    ) -> Result<(), SyncError> {
        let (mut sink, mut source) = stream.split();

        loop {
            let interval = self.engine.lock().await.reconcile_interval();

            tokio::select! {
                incoming = source.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match ServerEvent::from_json(&text) {
                            Ok(event) => self.engine.lock().await.handle_server_event(event),
                            Err(e) => debug!(error = %e, "Unparseable event ignored"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("Hub closed the connection");
                        return Ok(());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket read failed");
                        return Ok(());
                    }
                },

                event = outgoing.recv() => match event {
                    Some(event) => {
                        let json = event.to_json()?;
                        if sink.send(Message::Text(json)).await.is_err() {
                            warn!("WebSocket write failed");
                            return Ok(());
                        }
                    }
                    None => return Ok(()),
                },

                () = sleep_for(interval), if interval.is_some() => {
                    self.engine.lock().await.reconcile().await?;
                }
            }
        }
    }
}

async fn sleep_for(interval: Option<Duration>) {
    match interval {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}
