//! Error types for the regression harness

use thiserror::Error;

/// Failures of the harness itself, as opposed to failed checks
#[derive(Debug, Error)]
pub enum TestError {
    /// Output image could not be encoded or written
    #[error("cannot write regression output '{path}': {source}")]
    Output {
        path: String,
        #[source]
        source: maxtree_io::IoError,
    },

    /// Golden file could not be read or copied
    #[error("golden file error: {0}")]
    Golden(#[from] std::io::Error),
}

/// Result type for harness operations
pub type TestResult<T> = Result<T, TestError>;
