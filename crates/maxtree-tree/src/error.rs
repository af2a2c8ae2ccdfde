//! Error types for maxtree-tree

use thiserror::Error;

/// Errors that can occur while building or querying a max-tree
#[derive(Debug, Error)]
pub enum TreeError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] maxtree_core::Error),

    /// A queue, node array or attribute payload could not be allocated
    #[error("memory allocation failed")]
    AllocationFailed,

    /// Attribute index outside the registry
    #[error("unknown attribute index: {0} (expected 0..{max})", max = crate::attribute::AttributeKind::COUNT)]
    UnknownAttribute(usize),

    /// A level was flooded with nothing queued and no child to inherit
    #[error("flooding level {0} found an empty queue")]
    EmptyLevel(u8),
}

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;
