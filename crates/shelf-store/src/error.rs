use std::path::PathBuf;

use shelf_types::ContainerError;
use thiserror::Error;

/// Errors from record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file exists but does not decode as a record array.
    #[error("malformed store file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory collection failed to serialize.
    #[error("failed to encode records: {0}")]
    Encode(#[source] serde_json::Error),

    /// I/O failure reading or writing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Container resolution or directory operation failed.
    #[error("location error: {0}")]
    Location(#[from] ContainerError),

    /// An index-addressed operation was given an out-of-range index.
    #[error("index {index} out of bounds for {len} records")]
    OutOfBounds { index: usize, len: usize },

    /// The background load worker did not complete.
    #[error("background load failed: {0}")]
    Background(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
