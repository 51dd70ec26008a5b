use crate::ids::Id;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Arena entry for one content node. Links are IDs into the owning tree's arena.
#[derive(Clone, Debug)]
pub(crate) struct NodeState<T> {
    pub(crate) value: T,
    pub(crate) removed: bool,
    /// `None` when the node hangs directly off the root.
    pub(crate) parent: Option<Id>,
    /// Arrival order; sorted only when linearizing.
    pub(crate) children: Vec<Id>,
}

impl<T> NodeState<T> {
    pub(crate) fn new(value: T, parent: Option<Id>, removed: bool) -> Self {
        Self {
            value,
            removed,
            parent,
            children: Vec::new(),
        }
    }
}

/// Borrowed view of a node (or of the root) inside a tree.
#[derive(Debug)]
pub struct NodeRef<'a, T> {
    pub(crate) id: Id,
    pub(crate) parent: Option<Id>,
    pub(crate) value: Option<&'a T>,
    pub(crate) removed: bool,
    pub(crate) children: &'a [Id],
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn content(id: Id, state: &'a NodeState<T>) -> Self {
        Self {
            id,
            parent: state.parent,
            value: Some(&state.value),
            removed: state.removed,
            children: &state.children,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Causal parent, `None` for the root and for nodes attached to it.
    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    /// Payload; the root carries none.
    pub fn value(&self) -> Option<&'a T> {
        self.value
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }

    /// Children in arrival order, not in linearized order.
    pub fn children(&self) -> &'a [Id] {
        self.children
    }
}

/// One row of a linearized tree: what a driver ships to an editor or over the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeExport<T> {
    pub id: Id,
    pub parent_id: Option<Id>,
    pub value: T,
    pub removed: bool,
}
