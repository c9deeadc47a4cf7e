use mintline_ledger::LedgerError;
use mintline_types::{ValidationError, ValidationKind};

/// Errors that can end a gate evaluation.
///
/// Validation failures are caller/data errors surfaced verbatim and never
/// retried automatically; storage failures are transient and may be
/// retried by the caller. Force never bypasses a storage failure.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// A check stage failed and was not (or could not be) bypassed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A resolver lookup against the ledger failed.
    #[error("storage failure during validation: {0}")]
    Storage(#[from] LedgerError),
}

impl GateError {
    /// The validation kind, when this is a validation failure.
    pub fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            Self::Validation(e) => Some(e.kind()),
            Self::Storage(_) => None,
        }
    }

    /// Whether the caller may safely retry (storage failures only).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_retryable())
    }
}
