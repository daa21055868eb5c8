use thiserror::Error;

/// Conditions reported by tree queries and deletions.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum TreeError {
    #[error("key is not present in the tree")]
    NotFound,
    #[error("tree is empty")]
    EmptyTree,
    #[error("key is the maximum of the tree and has no successor")]
    NoSuccessor,
    #[error("key is the minimum of the tree and has no predecessor")]
    NoPredecessor,
}

pub type Result<T> = std::result::Result<T, TreeError>;
