//! Local message cache
//!
//! One post's comments, keyed by id with an incrementally maintained
//! newest-first order and a parent-to-children index. All merge operations
//! are idempotent and tolerate events for entries the cache has never seen;
//! broadcast delivery is unordered and may duplicate, so every operation
//! must be safe under any interleaving.

use std::collections::HashMap;

use tracing::trace;
use uuid::Uuid;

use agora_core::entities::{LikeWithUser, MessageWithRelations};

/// In-memory cache of one post's messages
#[derive(Debug, Clone)]
pub struct MessageCache {
    /// Post this cache belongs to
    post_id: Uuid,

    /// Message records by id
    records: HashMap<Uuid, MessageWithRelations>,

    /// Message ids, most recent first
    order: Vec<Uuid>,

    /// Parent id to child ids, each list most recent first
    children: HashMap<Uuid, Vec<Uuid>>,
}

impl MessageCache {
    /// Create an empty cache for a post
    #[must_use]
    pub fn new(post_id: Uuid) -> Self {
        Self {
            post_id,
            records: HashMap::new(),
            order: Vec::new(),
            children: HashMap::new(),
        }
    }

    /// Build a cache from the page-load snapshot
    ///
    /// The snapshot arrives most recent first and that order is kept as-is.
    #[must_use]
    pub fn from_snapshot(post_id: Uuid, snapshot: Vec<MessageWithRelations>) -> Self {
        let mut cache = Self::new(post_id);
        for message in snapshot {
            let id = message.id();
            if cache.records.contains_key(&id) {
                continue;
            }
            if let Some(parent_id) = message.message.parent_id {
                cache.children.entry(parent_id).or_default().push(id);
            }
            cache.order.push(id);
            cache.records.insert(id, message);
        }
        cache
    }

    /// The post this cache tracks
    #[inline]
    pub fn post_id(&self) -> Uuid {
        self.post_id
    }

    /// Number of cached messages
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the cache holds no messages
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Look up a message by id
    pub fn get(&self, id: Uuid) -> Option<&MessageWithRelations> {
        self.records.get(&id)
    }

    /// Whether a message id is present
    pub fn contains(&self, id: Uuid) -> bool {
        self.records.contains_key(&id)
    }

    /// All messages, most recent first
    pub fn messages(&self) -> impl Iterator<Item = &MessageWithRelations> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Child ids of a message, most recent first
    pub fn children_of(&self, parent_id: Uuid) -> &[Uuid] {
        self.children
            .get(&parent_id)
            .map_or(&[], |ids| ids.as_slice())
    }

    /// Merge a newly posted message
    ///
    /// A duplicate id is ignored; the sender can race its own broadcast and
    /// the hub may deliver twice. Returns whether the cache changed.
    pub fn apply_message_posted(&mut self, message: MessageWithRelations) -> bool {
        let id = message.id();
        if self.records.contains_key(&id) {
            trace!(message_id = %id, "Duplicate message ignored");
            return false;
        }

        if let Some(parent_id) = message.message.parent_id {
            self.children.entry(parent_id).or_default().insert(0, id);
        }
        self.order.insert(0, id);
        self.records.insert(id, message);
        true
    }

    /// Merge an edited message
    ///
    /// Only the text (and edit timestamp) is replaced; likes and position are
    /// preserved. An unknown id is ignored, the entry may belong to a part of
    /// the tree this tab never loaded. Returns whether the cache changed.
    pub fn apply_message_edited(&mut self, message: &MessageWithRelations) -> bool {
        let Some(entry) = self.records.get_mut(&message.id()) else {
            trace!(message_id = %message.id(), "Edit for unknown message ignored");
            return false;
        };

        entry.message.text = message.message.text.clone();
        entry.message.updated_at = message.message.updated_at;
        true
    }

    /// Attach a like to its message
    ///
    /// Deduplicated by like id; an unknown message is ignored. Returns
    /// whether the cache changed.
    pub fn apply_like_added(&mut self, message_id: Uuid, like: LikeWithUser) -> bool {
        let Some(entry) = self.records.get_mut(&message_id) else {
            trace!(message_id = %message_id, "Like for unknown message ignored");
            return false;
        };

        if entry.has_like(like.like.id) {
            trace!(like_id = %like.like.id, "Duplicate like ignored");
            return false;
        }

        entry.likes.push(like);
        true
    }

    /// Detach a like from its message by id
    ///
    /// A removal for an id never added (or already removed) is a no-op.
    /// Returns whether the cache changed.
    pub fn apply_like_removed(&mut self, message_id: Uuid, like_id: Uuid) -> bool {
        let Some(entry) = self.records.get_mut(&message_id) else {
            return false;
        };

        let before = entry.likes.len();
        entry.likes.retain(|l| l.like.id != like_id);
        entry.likes.len() != before
    }
}
