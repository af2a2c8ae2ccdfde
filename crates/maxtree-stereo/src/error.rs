//! Error types for maxtree-stereo

use thiserror::Error;

/// Errors that can occur while computing or scoring a disparity map
#[derive(Debug, Error)]
pub enum StereoError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] maxtree_core::Error),

    /// Tree construction error
    #[error("tree error: {0}")]
    Tree(#[from] maxtree_tree::TreeError),

    /// Two inputs that must share a size do not
    #[error("{what} size mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        /// Which pair of inputs disagreed
        what: &'static str,
        /// Reference size (width, height)
        expected: (u32, u32),
        /// Offending size (width, height)
        actual: (u32, u32),
    },
}

/// Result type for stereo operations
pub type StereoResult<T> = Result<T, StereoError>;

/// Fail with [`StereoError::DimensionMismatch`] unless both sizes agree
pub(crate) fn check_size(
    what: &'static str,
    expected: (u32, u32),
    actual: (u32, u32),
) -> StereoResult<()> {
    if expected != actual {
        return Err(StereoError::DimensionMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
