/// Errors from archive operations.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// No payloads are stored under the given key.
    #[error("no archived transaction under key {0:?}")]
    NotFound(String),

    /// The key (or the node id it would be built from) is malformed.
    #[error("invalid archive key: {0}")]
    InvalidKey(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;
