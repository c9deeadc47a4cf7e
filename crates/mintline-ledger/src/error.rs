/// Errors produced by ledger storage operations.
///
/// Transient conditions are distinguishable via
/// [`LedgerError::is_retryable`] so callers can retry with backoff a
/// bounded number of times. Query misses are not errors — zero matches
/// returns an empty set.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// I/O failure from the backing store (disk full, file locked, ...).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Row encoding or decoding failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The append lock could not be acquired within the configured retry
    /// budget; another writer holds it.
    #[error("ledger is busy: {0}")]
    Busy(String),
}

impl LedgerError {
    /// Whether the caller may safely retry after backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Busy(_))
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
