//! Comment tree derivation
//!
//! Pure function from the flat cache to the displayed reply forest. Top-level
//! nodes are the null-parent messages, most recent first; each node's
//! children follow the same order, recursively. Recomputed in full on every
//! cache change; comment trees are forum-scale, not firehose-scale.

use agora_core::entities::MessageWithRelations;
use uuid::Uuid;

use crate::cache::MessageCache;

/// Nesting depth past which no reply affordance is offered
///
/// Messages deeper than this still render; they just cannot be replied to.
pub const MAX_REPLY_DEPTH: usize = 8;

/// One node of the displayed comment forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    /// The message with author and likes
    pub message: MessageWithRelations,
    /// Nesting depth, zero for top-level comments
    pub depth: usize,
    /// Whether the UI offers a reply affordance at this depth
    pub can_reply: bool,
    /// Replies, most recent first
    pub children: Vec<CommentNode>,
}

/// Derive the reply forest from the flat cache
#[must_use]
pub fn derive_tree(cache: &MessageCache) -> Vec<CommentNode> {
    cache
        .messages()
        .filter(|m| m.message.parent_id.is_none())
        .map(|m| build_node(cache, m, 0))
        .collect()
}

fn build_node(cache: &MessageCache, message: &MessageWithRelations, depth: usize) -> CommentNode {
    let children = cache
        .children_of(message.id())
        .iter()
        .filter_map(|id| cache.get(*id))
        .map(|child| build_node(cache, child, depth + 1))
        .collect();

    CommentNode {
        message: message.clone(),
        depth,
        can_reply: depth < MAX_REPLY_DEPTH,
        children,
    }
}

/// Collect the top-level ids of a derived forest, in display order
#[must_use]
pub fn top_level_ids(forest: &[CommentNode]) -> Vec<Uuid> {
    forest.iter().map(|n| n.message.id()).collect()
}
