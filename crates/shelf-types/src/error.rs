use thiserror::Error;

/// Errors produced by container resolution and directory operations.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The container name is not usable as a directory name.
    #[error("invalid container name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// I/O failure while creating, destroying, or moving within a container.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;
