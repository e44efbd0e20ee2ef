//! Client event dispatch
//!
//! One entry point per connection: every decoded `ClientEvent` comes through
//! `EventDispatcher::dispatch`. Handlers for different connections run as
//! independent tasks; a slow persistence call suspends only its own event.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::broadcast::{broadcast_unlike, enrich_and_broadcast_like, enrich_and_broadcast_message};
use crate::protocol::{ClientEvent, PingPayload, ServerEvent};
use crate::rooms::Connection;
use crate::server::HubState;
use crate::HubError;

/// Routes client events to their handlers
pub struct EventDispatcher;

impl EventDispatcher {
    /// Handle a single event from a client
    ///
    /// Persistence failures are logged and swallowed: the event is dropped,
    /// the connection stays up, and nothing is reported back to the sender.
    pub async fn dispatch(
        state: &HubState,
        connection: &Arc<Connection>,
        event: ClientEvent,
    ) -> Result<(), HubError> {
        let session_id = connection.session_id();

        debug!(session_id = %session_id, event = event.name(), "Dispatching client event");

        let result = match event {
            ClientEvent::JoinPage(post_id) => {
                state.rooms().join(session_id, post_id).await;
                Ok(())
            }
            ClientEvent::LeavePage(post_id) => {
                state.rooms().leave(session_id, post_id).await;
                Ok(())
            }
            ClientEvent::MessagePosted(message) => {
                enrich_and_broadcast_message(state, session_id, message.id, false)
                    .await
                    .map(|_| ())
            }
            ClientEvent::MessageEdited(message) => {
                enrich_and_broadcast_message(state, session_id, message.id, true)
                    .await
                    .map(|_| ())
            }
            ClientEvent::LikePosted(like) => {
                enrich_and_broadcast_like(state, session_id, like.id)
                    .await
                    .map(|_| ())
            }
            ClientEvent::UnlikePosted(like) => {
                broadcast_unlike(state, session_id, like).await;
                Ok(())
            }
            ClientEvent::Ping(payload) => Self::handle_ping(state, connection, payload).await,
        };

        if let Err(e) = result {
            if e.is_fatal() {
                return Err(e);
            }
            warn!(session_id = %session_id, error = %e, "Event dropped");
        }

        Ok(())
    }

    /// Compare the client's message count against the store
    ///
    /// On disagreement, `outOfSync` goes back to the pinging connection only;
    /// the rest of the room is never told.
    async fn handle_ping(
        state: &HubState,
        connection: &Arc<Connection>,
        payload: PingPayload,
    ) -> Result<(), HubError> {
        let actual = state
            .service_context()
            .message_repo()
            .count_by_post(payload.post_id)
            .await?;

        if actual != payload.number_of_messages_in_list {
            debug!(
                session_id = %connection.session_id(),
                post_id = %payload.post_id,
                client_count = payload.number_of_messages_in_list,
                actual_count = actual,
                "Drift detected"
            );
            connection.send(ServerEvent::OutOfSync(true)).await?;
        }

        Ok(())
    }
}
