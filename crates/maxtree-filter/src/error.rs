//! Error types for maxtree-filter

use thiserror::Error;

/// Errors that can occur while filtering an image
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] maxtree_core::Error),

    /// Tree construction error
    #[error("tree error: {0}")]
    Tree(#[from] maxtree_tree::TreeError),

    /// Decision index outside the table
    #[error("unknown decision index: {0} (expected 0..{max})", max = crate::Decision::COUNT)]
    UnknownDecision(usize),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
