//! I/O error types
//!
//! Decoder and encoder errors of the format crates are converted to
//! strings at the module boundary, so callers see a single error type.

use thiserror::Error;

/// Error type for reading and writing images
#[derive(Error, Debug)]
pub enum IoError {
    /// Underlying file or stream error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Format not recognized, not grayscale-capable, or feature disabled
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Malformed header or truncated pixel data
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// PNG or TIFF decoder failure
    #[error("decode error: {0}")]
    DecodeError(String),

    /// PNG or TIFF encoder failure
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Image or template construction failed
    #[error("core error: {0}")]
    Core(#[from] maxtree_core::Error),
}

/// Result type for image I/O
pub type IoResult<T> = Result<T, IoError>;
