//! WebSocket handler
//!
//! Upgrades HTTP requests and runs the per-connection socket loop.

use std::sync::Arc;

use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::handlers::EventDispatcher;
use crate::protocol::{ClientEvent, ServerEvent};
use crate::rooms::Connection;
use crate::server::HubState;

/// WebSocket hub handler
pub async fn hub_handler(
    State(state): State<HubState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: HubState, socket: axum::extract::ws::WebSocket) {
    let session_id = Uuid::new_v4().to_string();

    // Channel for outgoing events
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(state.config().hub.message_buffer);

    let connection = state.rooms().add_connection(session_id.clone(), tx);

    tracing::info!(session_id = %session_id, "WebSocket connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Confirmation goes out before anything else
    let confirmation =
        ServerEvent::Confirmation(state.config().hub.confirmation_text.clone());
    if let Ok(json) = confirmation.to_json() {
        if ws_sink.send(Message::Text(json.into())).await.is_err() {
            tracing::warn!(session_id = %session_id, "Failed to send confirmation");
            cleanup_connection(&state, &session_id).await;
            return;
        }
    }

    let state_recv = state.clone();
    let session_id_recv = session_id.clone();
    let connection_recv = connection.clone();

    // Receive events from the WebSocket
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if handle_text_message(&state_recv, &connection_recv, &text)
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        session_id = %session_id_recv,
                        "Binary messages not supported"
                    );
                    return;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    tracing::trace!(session_id = %session_id_recv, "Transport ping/pong");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id_recv, "Client closed connection");
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id_recv,
                        error = %e,
                        "WebSocket error"
                    );
                    return;
                }
            }
        }
    });

    let session_id_send = session_id.clone();

    // Forward events from the channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Ok(json) = event.to_json() {
                if ws_sink.send(Message::Text(json.into())).await.is_err() {
                    tracing::warn!(
                        session_id = %session_id_send,
                        "Failed to send event to WebSocket"
                    );
                    break;
                }
            }
        }

        let _ = ws_sink.close().await;
    });

    tokio::select! {
        _ = recv_task => {
            tracing::debug!(session_id = %session_id, "Receive task ended");
        }
        _ = send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
        }
    }

    cleanup_connection(&state, &session_id).await;
}

/// Handle a text frame from the client
///
/// Unparseable frames are dropped without touching the connection, the
/// same way persistence failures drop the event during dispatch.
async fn handle_text_message(
    state: &HubState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), crate::HubError> {
    let event = match ClientEvent::from_json(text) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(
                session_id = %connection.session_id(),
                error = %e,
                "Undecodable frame dropped"
            );
            return Ok(());
        }
    };

    EventDispatcher::dispatch(state, connection, event).await
}

/// Clean up a connection on disconnect
async fn cleanup_connection(state: &HubState, session_id: &str) {
    tracing::info!(session_id = %session_id, "Cleaning up connection");
    state.rooms().remove_connection(session_id).await;
}
