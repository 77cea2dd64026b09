use generational_arena::Index;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node does not exist in this arena: {0:?}")]
    MissingNode(Index),

    #[error("cannot attach a node to itself: {0:?}")]
    SelfAttach(Index),

    #[error("attaching {child:?} below {parent:?} would create a cycle")]
    CycleDetected { parent: Index, child: Index },

    #[error("node {node:?} is not within the subtree of {bound:?}")]
    OutsideSubtree { node: Index, bound: Index },

    #[error("invalid cursor state: {0}")]
    InvalidState(&'static str),

    #[error("child index {index} out of range for {len} children")]
    OutOfRange { index: usize, len: usize },

    #[error("malformed encoded tree: {0}")]
    Decode(String),

    #[error("cannot encode tree: {0}")]
    Encode(String),
}

pub type TreeResult<T> = Result<T, TreeError>;
