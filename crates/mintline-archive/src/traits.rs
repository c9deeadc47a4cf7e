use chrono::{DateTime, Utc};

use crate::error::ArchiveResult;
use crate::key::ArchiveKey;

/// The raw input/output pair captured for one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionPayloads {
    pub input: Vec<u8>,
    pub output: Vec<u8>,
}

/// Archival storage for raw transaction payloads.
///
/// All implementations must satisfy these invariants:
/// - A returned key always has both payloads fully stored behind it; a
///   crash mid-store never leaves a half-written pair observable.
/// - Payloads are immutable once written; a colliding key gets a suffix
///   instead of overwriting.
/// - All I/O errors are propagated, never silently ignored.
pub trait TransactionArchive: Send + Sync {
    /// Store a payload pair for the given node and moment; returns the key
    /// the ledger row should carry as its `transaction_key`.
    fn store(
        &self,
        node_id: &str,
        moment: DateTime<Utc>,
        input: &[u8],
        output: &[u8],
    ) -> ArchiveResult<ArchiveKey>;

    /// Load the payload pair stored under a key.
    fn load(&self, key: &ArchiveKey) -> ArchiveResult<TransactionPayloads>;

    /// Whether a payload pair is stored under the key.
    fn exists(&self, key: &ArchiveKey) -> ArchiveResult<bool>;
}
