#![forbid(unsafe_code)]
//! Core of a causal tree: a replicated tree CRDT for collaborative sequences.
//! Every element records the element it was inserted after, replicas exchange whole trees with
//! [`CausalTree::merge`], and a fixed depth-first walk turns the tree back into one sequence.
//! The crate has no I/O and no concurrency of its own; hosts drive it.

pub mod clock;
pub mod error;
pub mod ids;
pub mod merge;
pub mod node;
mod traversal;
pub mod tree;

pub use clock::LamportClock;
pub use error::{Error, Result};
pub use ids::{EntityId, Id, Lamport};
pub use merge::MergeDelta;
pub use node::{NodeExport, NodeRef};
pub use tree::CausalTree;
