#![forbid(unsafe_code)]
//! Shared helpers for exercising several causal tree replicas together.

use std::collections::BTreeMap;

use causal_tree_core::{CausalTree, EntityId, MergeDelta, Result};
use tracing::debug;

/// Visible content of a character tree.
pub fn text(tree: &CausalTree<char>) -> String {
    tree.values(false).into_iter().collect()
}

/// Replicas keyed by entity id, merged pairwise the way a host would on every sync tick.
pub struct Cluster<T> {
    replicas: BTreeMap<EntityId, CausalTree<T>>,
}

impl<T> Default for Cluster<T> {
    fn default() -> Self {
        Self {
            replicas: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Cluster<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replicas(ids: impl IntoIterator<Item = EntityId>) -> Self {
        let mut cluster = Self::new();
        for id in ids {
            cluster.add_replica(id);
        }
        cluster
    }

    /// Register a fresh replica; an existing one with the same id is kept.
    pub fn add_replica(&mut self, id: EntityId) -> &mut CausalTree<T> {
        self.replicas.entry(id).or_insert_with(|| CausalTree::new(id))
    }

    pub fn replica(&self, id: EntityId) -> Option<&CausalTree<T>> {
        self.replicas.get(&id)
    }

    pub fn replica_mut(&mut self, id: EntityId) -> Option<&mut CausalTree<T>> {
        self.replicas.get_mut(&id)
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.replicas.keys().copied().collect()
    }

    /// One-directional merge of `src` into `dst`. Merging a replica into itself is skipped.
    pub fn sync(&mut self, dst: EntityId, src: EntityId) -> Result<MergeDelta> {
        if dst == src || !self.replicas.contains_key(&dst) {
            return Ok(MergeDelta::default());
        }
        // The source is cloned so the destination can be borrowed mutably from the same map.
        let Some(source) = self.replicas.get(&src).cloned() else {
            return Ok(MergeDelta::default());
        };
        match self.replicas.get_mut(&dst) {
            Some(target) => target.merge(&source),
            None => Ok(MergeDelta::default()),
        }
    }

    /// Merge every replica into every other one, in id order. Returns the summed delta.
    pub fn sync_all(&mut self) -> Result<MergeDelta> {
        let ids = self.ids();
        let mut total = MergeDelta::default();
        for dst in &ids {
            for src in &ids {
                let delta = self.sync(*dst, *src)?;
                total.inserted += delta.inserted;
                total.tombstoned += delta.tombstoned;
            }
        }
        debug!(
            replicas = ids.len(),
            inserted = total.inserted,
            tombstoned = total.tombstoned,
            "synced cluster"
        );
        Ok(total)
    }

    /// Whether every replica linearizes to the same rows, tombstones included.
    pub fn converged(&self) -> bool
    where
        T: PartialEq,
    {
        let mut rows = self.replicas.values().map(|tree| tree.ordered_nodes(true));
        match rows.next() {
            Some(first) => rows.all(|other| other == first),
            None => true,
        }
    }
}

impl Cluster<char> {
    /// Visible text of replica `id`, empty when it is unknown.
    pub fn text(&self, id: EntityId) -> String {
        self.replica(id).map(text).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_all_converges_independent_edits() {
        let mut cluster: Cluster<char> = Cluster::with_replicas([1, 2, 3]);
        for id in cluster.ids() {
            let tree = cluster.replica_mut(id).unwrap();
            tree.add_sequence(None, format!("r{id}").chars()).unwrap();
        }
        assert!(!cluster.converged());

        cluster.sync_all().unwrap();
        assert!(cluster.converged());
        assert_eq!(cluster.text(1), cluster.text(3));
        assert!(cluster.sync_all().unwrap().is_empty());
    }

    #[test]
    fn self_sync_is_skipped() {
        let mut cluster: Cluster<char> = Cluster::with_replicas([1]);
        cluster.replica_mut(1).unwrap().add_node(None, 'x').unwrap();
        assert!(cluster.sync(1, 1).unwrap().is_empty());
        assert_eq!(cluster.text(1), "x");
    }

    #[test]
    fn unknown_replicas_are_ignored() {
        let mut cluster: Cluster<char> = Cluster::with_replicas([1]);
        assert!(cluster.sync(1, 9).unwrap().is_empty());
        assert!(cluster.sync(9, 1).unwrap().is_empty());
        assert_eq!(cluster.text(9), "");
    }
}
