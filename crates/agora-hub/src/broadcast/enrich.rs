//! Enrichment step: re-fetch the full entity before fan-out
//!
//! Clients publish bare references after their own successful write; the hub
//! re-reads the entity with relations and broadcasts whatever is latest at
//! re-fetch time (last-write-wins). A reference that no longer resolves is
//! dropped without error: this channel is for liveness, not durability.

use tracing::{debug, instrument, warn};
use uuid::Uuid;

use agora_core::entities::LikeWithRelations;

use crate::protocol::ServerEvent;
use crate::server::HubState;
use crate::HubError;

/// What became of a publish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// Delivered to this many room members (sender excluded)
    Delivered(usize),
    /// Entity no longer exists; nothing was sent
    Dropped,
}

impl BroadcastOutcome {
    /// Whether the event reached anyone
    pub fn was_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// Re-fetch a message and broadcast it to its post's room
///
/// Used for both `messagePosted` and `messageEdited`; `edited` selects the
/// outgoing event kind.
#[instrument(skip(state))]
pub async fn enrich_and_broadcast_message(
    state: &HubState,
    sender_session: &str,
    message_id: Uuid,
    edited: bool,
) -> Result<BroadcastOutcome, HubError> {
    let Some(message) = state
        .service_context()
        .message_repo()
        .find_by_id_with_relations(message_id)
        .await?
    else {
        debug!(message_id = %message_id, "Message vanished before broadcast, dropping");
        return Ok(BroadcastOutcome::Dropped);
    };

    let post_id = message.post_id();
    let event = if edited {
        ServerEvent::MessageEdited(message)
    } else {
        ServerEvent::MessagePosted(message)
    };

    let sent = state
        .rooms()
        .send_to_room(post_id, event, Some(sender_session))
        .await;

    Ok(BroadcastOutcome::Delivered(sent))
}

/// Re-fetch a like and broadcast it to its message's post room
#[instrument(skip(state))]
pub async fn enrich_and_broadcast_like(
    state: &HubState,
    sender_session: &str,
    like_id: Uuid,
) -> Result<BroadcastOutcome, HubError> {
    let Some(like) = state
        .service_context()
        .like_repo()
        .find_by_id_with_relations(like_id)
        .await?
    else {
        debug!(like_id = %like_id, "Like vanished before broadcast, dropping");
        return Ok(BroadcastOutcome::Dropped);
    };

    let post_id = like.post_id();
    let sent = state
        .rooms()
        .send_to_room(post_id, ServerEvent::LikePosted(like), Some(sender_session))
        .await;

    Ok(BroadcastOutcome::Delivered(sent))
}

/// Broadcast an already-deleted like as received
///
/// The record no longer exists in the store, so it cannot be re-validated;
/// the client-supplied payload is relayed verbatim.
#[instrument(skip(state, like), fields(like_id = %like.like.id))]
pub async fn broadcast_unlike(
    state: &HubState,
    sender_session: &str,
    like: LikeWithRelations,
) -> BroadcastOutcome {
    let post_id = like.post_id();

    debug!(
        like_id = %like.like.id,
        post_id = %post_id,
        "Relaying unlike as received (record already deleted)"
    );

    let sent = state
        .rooms()
        .send_to_room(post_id, ServerEvent::UnlikePosted(like), Some(sender_session))
        .await;

    if sent == 0 {
        warn!(post_id = %post_id, "Unlike relayed to empty room");
    }

    BroadcastOutcome::Delivered(sent)
}
