use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IdentError;
use crate::ident::ProductId;
use crate::product::ProductKind;
use crate::status::LifecycleStatus;

/// One persisted transaction row: the state of an identifier at a point in
/// its registration workflow.
///
/// Rows are append-only. A row is created only through the transaction
/// recorder and never mutated after insertion; it stops being authoritative
/// when a newer row for the same identifier supersedes it (the storage
/// layer clears `is_latest` in the same atomic unit that inserts the
/// successor).
///
/// Timestamps are UTC and persist as epoch seconds, so a row written and
/// re-read reproduces them exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoiRecord {
    /// The structured product identifier, optionally versioned. Stored as
    /// submitted (normalized by the recorder); syntax is enforced by the
    /// workflow gate before any row reaches storage.
    pub identifier: String,
    /// Current workflow state.
    pub status: LifecycleStatus,
    /// When this row was added to the ledger.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date_added: DateTime<Utc>,
    /// When the underlying metadata was last touched.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date_updated: DateTime<Utc>,
    /// Who submitted the transaction.
    pub submitter: String,
    /// Product title.
    pub title: String,
    /// Product classification.
    pub product_kind: ProductKind,
    /// Free-text specialization of the classification.
    pub product_subkind: String,
    /// Owning organizational unit.
    pub node_id: String,
    /// The DOI assigned by the registration provider, once minted.
    pub doi: Option<String>,
    /// Pointer into archival storage for this transaction's raw payloads.
    pub transaction_key: String,
    /// Whether this row is the identifier's current state.
    pub is_latest: bool,
}

impl DoiRecord {
    /// Content equality: every field except the two timestamps,
    /// `transaction_key`, and `is_latest`.
    ///
    /// Drives the recorder's idempotence guarantee — re-recording an
    /// identical candidate must not create a second row.
    pub fn same_content(&self, other: &DoiRecord) -> bool {
        self.identifier == other.identifier
            && self.status == other.status
            && self.submitter == other.submitter
            && self.title == other.title
            && self.product_kind == other.product_kind
            && self.product_subkind == other.product_subkind
            && self.node_id == other.node_id
            && self.doi == other.doi
    }

    /// Parse the stored identifier string back into its structured form.
    pub fn parsed_identifier(&self) -> Result<ProductId, IdentError> {
        ProductId::parse(&self.identifier)
    }
}
