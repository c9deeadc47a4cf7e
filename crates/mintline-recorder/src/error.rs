use mintline_archive::ArchiveError;
use mintline_gate::GateError;
use mintline_ledger::LedgerError;
use mintline_types::{ValidationError, ValidationKind};

/// The closed top-level error taxonomy callers of the recorder see.
///
/// Validation failures are surfaced verbatim and never retried
/// automatically; storage and archive I/O failures are transient and may
/// be retried by the caller a bounded number of times.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A workflow invariant refused the candidate.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The ledger's backing store failed.
    #[error("ledger storage failure: {0}")]
    Storage(#[from] LedgerError),

    /// Archival of the raw payloads failed.
    #[error("archive failure: {0}")]
    Archive(#[from] ArchiveError),
}

impl RecordError {
    /// The validation kind, when this is a validation failure.
    pub fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            Self::Validation(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Whether the caller may safely retry after backoff.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) => false,
            Self::Storage(e) => e.is_retryable(),
            Self::Archive(e) => matches!(e, ArchiveError::Io(_)),
        }
    }
}

impl From<GateError> for RecordError {
    fn from(e: GateError) -> Self {
        match e {
            GateError::Validation(v) => Self::Validation(v),
            GateError::Storage(s) => Self::Storage(s),
        }
    }
}
