use shelf_store::StoreError;
use shelf_types::{AssetId, ContainerError};
use thiserror::Error;

/// Errors from asset lifecycle operations.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Non-empty data that the configured decoder rejects cannot become
    /// new asset content. (Empty data is not an error — it means "delete
    /// the existing asset".)
    #[error("data does not decode as an asset blob")]
    InvalidData,

    /// Promotion was attempted for an asset that has no backing file.
    #[error("no backing file for asset {0}")]
    MissingBacking(AssetId),

    /// Container resolution, directory creation, or file move failed.
    #[error("location error: {0}")]
    Location(#[from] ContainerError),

    /// The underlying record store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O failure on an asset's backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;
