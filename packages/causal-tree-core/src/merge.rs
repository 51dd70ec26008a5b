use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ids::Id;
use crate::node::NodeState;
use crate::tree::CausalTree;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a merge changed on the receiving replica.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MergeDelta {
    /// Nodes copied in from the source.
    pub inserted: usize,
    /// Nodes already known here that the source had tombstoned.
    pub tombstoned: usize,
}

impl MergeDelta {
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.tombstoned == 0
    }
}

impl<T: Clone> CausalTree<T> {
    /// Make this replica a superset of `other`.
    ///
    /// Unknown nodes are copied with their ID, value and tombstone flag under the same causal
    /// parent; known nodes only pick up the source's tombstone. Nothing is re-parented, re-keyed
    /// or dropped, so merging is idempotent and both directions together converge.
    ///
    /// Every new node's parent has to be known here or arrive earlier in the same pass. If one is
    /// not, the merge returns [`Error::MissingParent`] and this tree is left untouched, clock
    /// included.
    pub fn merge(&mut self, other: &CausalTree<T>) -> Result<MergeDelta> {
        let mut incoming: Vec<(Id, NodeState<T>)> = Vec::new();
        let mut planned: HashSet<Id> = HashSet::new();
        let mut tombstones: Vec<Id> = Vec::new();

        // Pre-order puts every parent ahead of its children.
        for (id, theirs) in other.preorder() {
            if let Some(ours) = self.nodes.get(&id) {
                if theirs.removed && !ours.removed {
                    tombstones.push(id);
                }
                continue;
            }

            if let Some(parent) = theirs.parent {
                if !self.nodes.contains_key(&parent) && !planned.contains(&parent) {
                    warn!(
                        node = %id,
                        parent = %parent,
                        from = other.entity_id(),
                        into = self.entity_id(),
                        "rejected merge: causal parent never seen"
                    );
                    return Err(Error::MissingParent {
                        node: Some(id),
                        parent,
                    });
                }
            }

            planned.insert(id);
            incoming.push((
                id,
                NodeState::new(theirs.value.clone(), theirs.parent, theirs.removed),
            ));
        }

        self.clock.observe(other.lamport());

        let delta = MergeDelta {
            inserted: incoming.len(),
            tombstoned: tombstones.len(),
        };
        for (id, state) in incoming {
            self.attach(id, state);
        }
        for id in tombstones {
            self.remove_node(id);
        }

        debug!(
            from = other.entity_id(),
            into = self.entity_id(),
            inserted = delta.inserted,
            tombstoned = delta.tombstoned,
            lamport = self.lamport(),
            "merged replica"
        );
        Ok(delta)
    }
}
