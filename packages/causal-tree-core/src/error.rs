use thiserror::Error;

use crate::ids::Id;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An insertion or merge referenced a causal parent this tree has never seen.
    ///
    /// `node` is `None` for local insertions, which fail before an ID is minted.
    #[error("missing parent {parent} for node {}", display_node(.node))]
    MissingParent { node: Option<Id>, parent: Id },
    #[error("inconsistent state: {0}")]
    InconsistentState(String),
}

fn display_node(node: &Option<Id>) -> String {
    match node {
        Some(id) => id.to_string(),
        None => "<unminted>".into(),
    }
}
