use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lamport timestamp used for ordering nodes.
pub type Lamport = u64;

/// Identifier of the replica that owns a tree. Stable for the replica's lifetime.
pub type EntityId = u64;

/// Unique identifier for a node: the minting replica's Lamport time paired with its entity id.
///
/// The derived `Ord` is the plain `(timestamp, entity_id)` order. Siblings are linearized with
/// [`Id::sibling_cmp`], which runs the other way.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Id {
    pub timestamp: Lamport,
    pub entity_id: EntityId,
}

impl Id {
    pub const fn new(timestamp: Lamport, entity_id: EntityId) -> Self {
        Self {
            timestamp,
            entity_id,
        }
    }

    /// Sentinel naming the synthetic root of `entity_id`'s tree.
    pub const fn root(entity_id: EntityId) -> Self {
        Self::new(0, entity_id)
    }

    pub fn is_root(&self) -> bool {
        self.timestamp == 0
    }

    /// Order used between siblings: the larger timestamp comes first, and on equal timestamps the
    /// larger entity id comes first.
    ///
    /// Every replica must agree on this rule exactly, otherwise linearizations diverge.
    pub fn sibling_cmp(&self, other: &Id) -> Ordering {
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.entity_id.cmp(&self.entity_id))
    }

    /// Whether `self` is placed before `other` among siblings.
    pub fn sorts_before(&self, other: &Id) -> bool {
        self.sibling_cmp(other) == Ordering::Less
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.entity_id, self.timestamp)
    }
}
