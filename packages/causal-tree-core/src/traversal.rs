use std::collections::HashMap;

use crate::ids::Id;
use crate::node::NodeState;

/// Depth-first pre-order walk below the root.
///
/// Siblings are sorted with [`Id::sibling_cmp`] before the walk descends into them. The root is
/// never yielded. Nothing is cached: every walk reads the arena as it is right now.
pub(crate) struct Preorder<'a, T> {
    nodes: &'a HashMap<Id, NodeState<T>>,
    stack: Vec<Id>,
}

impl<'a, T> Preorder<'a, T> {
    pub(crate) fn new(nodes: &'a HashMap<Id, NodeState<T>>, root_children: &[Id]) -> Self {
        let mut stack = Vec::with_capacity(root_children.len());
        push_siblings(&mut stack, root_children);
        Self { nodes, stack }
    }
}

impl<'a, T> Iterator for Preorder<'a, T> {
    type Item = (Id, &'a NodeState<T>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.stack.pop()?;
            // Child lists only ever name arena entries; skip rather than trust that blindly.
            let Some(state) = self.nodes.get(&id) else {
                continue;
            };
            push_siblings(&mut self.stack, &state.children);
            return Some((id, state));
        }
    }
}

/// Push `children` so that the first in sibling order is popped first.
fn push_siblings(stack: &mut Vec<Id>, children: &[Id]) {
    let mut sorted = children.to_vec();
    sorted.sort_unstable_by(|a, b| a.sibling_cmp(b));
    stack.extend(sorted.into_iter().rev());
}
