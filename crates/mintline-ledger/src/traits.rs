use mintline_types::DoiRecord;

use crate::error::LedgerResult;
use crate::query::Criteria;

/// A freshly appended row together with its storage-assigned position
/// (1-based, monotonic within the store).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Appended {
    pub seq: u64,
    pub row: DoiRecord,
}

/// Storage boundary for the transaction ledger.
///
/// Implementations must satisfy these invariants:
/// - `append` inserts the row and, within the same atomic unit, clears
///   `is_latest` on every existing row the new identifier supersedes whose
///   `date_added` does not exceed the new row's. A reader never observes
///   two, or zero, latest rows for an identifier that has at least one.
/// - `append` leaves no partial row visible on failure.
/// - `query` returns only latest rows unless the criteria ask for history,
///   and returns an empty set (never an error) on zero matches.
pub trait LedgerStore: Send + Sync {
    /// Insert a row and maintain the latest-row derivation atomically.
    fn append(&self, row: DoiRecord) -> LedgerResult<Appended>;

    /// Return rows matching a conjunction of per-field predicates.
    fn query(&self, criteria: &Criteria) -> LedgerResult<Vec<DoiRecord>>;

    /// Total number of rows, historical rows included.
    fn row_count(&self) -> LedgerResult<u64>;
}
