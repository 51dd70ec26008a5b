use std::collections::{HashMap, HashSet};

use tracing::{trace, warn};

use crate::clock::LamportClock;
use crate::error::{Error, Result};
use crate::ids::{EntityId, Id, Lamport};
use crate::node::{NodeExport, NodeRef, NodeState};
use crate::traversal::Preorder;

/// A replica of the causal tree.
///
/// Each node records the node it was inserted after (its causal parent). Reading the tree back
/// walks it depth-first with siblings ordered by [`Id::sibling_cmp`], so replicas holding the
/// same node set produce the same sequence. Removal only sets a tombstone; nodes are never
/// dropped.
#[derive(Clone, Debug)]
pub struct CausalTree<T> {
    entity_id: EntityId,
    pub(crate) clock: LamportClock,
    pub(crate) root_children: Vec<Id>,
    pub(crate) nodes: HashMap<Id, NodeState<T>>,
}

impl<T> CausalTree<T> {
    pub fn new(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            clock: LamportClock::default(),
            root_children: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Current Lamport time as observed by this replica.
    pub fn lamport(&self) -> Lamport {
        self.clock.now()
    }

    /// The tree's own ID: its clock paired with its entity id.
    ///
    /// Right after a local insertion this is the ID just minted.
    pub fn id(&self) -> Id {
        Id::new(self.clock.now(), self.entity_id)
    }

    pub fn root_id(&self) -> Id {
        Id::root(self.entity_id)
    }

    /// Number of content nodes, tombstones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of content nodes that are not tombstoned.
    pub fn visible_len(&self) -> usize {
        self.nodes.values().filter(|n| !n.removed).count()
    }

    /// Append `value` as a child of `parent_id`, or of the root when `parent_id` is `None` or a
    /// root sentinel. Returns the newly minted ID.
    ///
    /// A parent this replica has never seen is a causality violation: nothing is inserted and
    /// the clock does not move.
    pub fn add_node(&mut self, parent_id: Option<Id>, value: T) -> Result<Id> {
        let parent = self.resolve_parent(parent_id)?;
        let id = Id::new(self.clock.tick(), self.entity_id);
        self.attach(id, NodeState::new(value, parent, false));
        trace!(node = %id, parent = ?parent, "added node");
        Ok(id)
    }

    /// Append `values` as a causal chain: each one is inserted after the previous.
    ///
    /// Returns the last minted ID, or `parent_id` unchanged when `values` is empty.
    pub fn add_sequence<I>(&mut self, parent_id: Option<Id>, values: I) -> Result<Option<Id>>
    where
        I: IntoIterator<Item = T>,
    {
        self.resolve_parent(parent_id)?;
        let mut last = parent_id;
        for value in values {
            last = Some(self.add_node(last, value)?);
        }
        Ok(last)
    }

    /// Tombstone the node with `id`. Unknown IDs and the root are ignored.
    ///
    /// Returns whether the node went from visible to removed. Children are untouched.
    pub fn remove_node(&mut self, id: Id) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) if !node.removed => {
                node.removed = true;
                trace!(node = %id, "removed node");
                true
            }
            _ => false,
        }
    }

    /// Look up a node. Any root sentinel resolves to this tree's root.
    pub fn find(&self, id: Id) -> Option<NodeRef<'_, T>> {
        if id.is_root() {
            return Some(NodeRef {
                id: self.root_id(),
                parent: None,
                value: None,
                removed: false,
                children: &self.root_children,
            });
        }
        self.nodes.get(&id).map(|state| NodeRef::content(id, state))
    }

    pub fn exists(&self, id: Id) -> bool {
        id.is_root() || self.nodes.contains_key(&id)
    }

    /// Lazily walk the tree in linearized order, skipping tombstones unless `include_removed`.
    ///
    /// A tombstone never hides its descendants.
    pub fn iter(&self, include_removed: bool) -> impl Iterator<Item = NodeRef<'_, T>> + '_ {
        self.preorder()
            .filter(move |(_, state)| include_removed || !state.removed)
            .map(|(id, state)| NodeRef::content(id, state))
    }

    /// Linearized node IDs.
    pub fn ordered_ids(&self, include_removed: bool) -> Vec<Id> {
        self.iter(include_removed).map(|n| n.id()).collect()
    }

    /// Linearized payloads.
    pub fn values(&self, include_removed: bool) -> Vec<&T> {
        self.iter(include_removed).filter_map(|n| n.value()).collect()
    }

    /// ID of the `index`-th visible node, for turning an editing position into a causal parent.
    pub fn id_at(&self, index: usize) -> Option<Id> {
        self.iter(false).nth(index).map(|n| n.id())
    }

    /// Check the structural invariants of the arena. Intended for tests and debugging.
    ///
    /// Every child link must agree with the child's parent link, no node may be listed twice,
    /// every node must be reachable from the root, and no timestamp may be ahead of the clock.
    pub fn validate_invariants(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        let mut check_children = |parent: Option<Id>, children: &[Id]| -> Result<()> {
            for child in children {
                if !seen.insert(*child) {
                    return Err(Error::InconsistentState(format!(
                        "node {child} listed more than once"
                    )));
                }
                let Some(state) = self.nodes.get(child) else {
                    return Err(Error::InconsistentState(format!(
                        "child {child} not present in nodes"
                    )));
                };
                if state.parent != parent {
                    return Err(Error::InconsistentState(format!(
                        "child {child} parent mismatch"
                    )));
                }
            }
            Ok(())
        };

        check_children(None, &self.root_children)?;
        for (id, state) in &self.nodes {
            check_children(Some(*id), &state.children)?;
        }

        if seen.len() != self.nodes.len() {
            return Err(Error::InconsistentState(format!(
                "{} nodes unreachable from root",
                self.nodes.len() - seen.len()
            )));
        }
        if let Some(id) = self.nodes.keys().find(|id| id.timestamp > self.clock.now()) {
            return Err(Error::InconsistentState(format!(
                "node {id} is ahead of clock {}",
                self.clock.now()
            )));
        }
        Ok(())
    }

    pub(crate) fn preorder(&self) -> Preorder<'_, T> {
        Preorder::new(&self.nodes, &self.root_children)
    }

    /// Map a requested parent to the arena key used for it, `None` meaning the root.
    fn resolve_parent(&self, parent_id: Option<Id>) -> Result<Option<Id>> {
        match parent_id {
            None => Ok(None),
            Some(id) if id.is_root() => Ok(None),
            Some(id) if self.nodes.contains_key(&id) => Ok(Some(id)),
            Some(id) => {
                warn!(parent = %id, entity = self.entity_id, "rejected insertion after unknown node");
                Err(Error::MissingParent {
                    node: None,
                    parent: id,
                })
            }
        }
    }

    /// Link a node under its (already resolved) parent and store it.
    pub(crate) fn attach(&mut self, id: Id, state: NodeState<T>) {
        match state.parent {
            None => self.root_children.push(id),
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(&parent) {
                    p.children.push(id);
                }
            }
        }
        self.nodes.insert(id, state);
    }
}

impl<T: Clone> CausalTree<T> {
    /// The tree in linearized order as owned rows, skipping tombstones unless `include_removed`.
    pub fn ordered_nodes(&self, include_removed: bool) -> Vec<NodeExport<T>> {
        self.preorder()
            .filter(|(_, state)| include_removed || !state.removed)
            .map(|(id, state)| NodeExport {
                id,
                parent_id: state.parent,
                value: state.value.clone(),
                removed: state.removed,
            })
            .collect()
    }
}
