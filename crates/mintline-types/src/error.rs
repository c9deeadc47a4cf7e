use thiserror::Error;

use crate::status::LifecycleStatus;

/// A string token that does not name a member of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {expected} token: {token:?}")]
pub struct TokenError {
    pub token: String,
    pub expected: &'static str,
}

/// A malformed product identifier.
///
/// Never recoverable automatically and never bypassable by `force`: a
/// malformed identifier cannot be safely stored or queried later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentError {
    /// The identifier as submitted.
    pub identifier: String,
    /// The offending segment, when the failure is attributable to one.
    pub segment: Option<String>,
    /// What rule the identifier broke.
    pub reason: String,
}

impl std::fmt::Display for IdentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.segment {
            Some(segment) => write!(
                f,
                "invalid identifier {:?} (segment {:?}): {}",
                self.identifier, segment, self.reason
            ),
            None => write!(f, "invalid identifier {:?}: {}", self.identifier, self.reason),
        }
    }
}

impl std::error::Error for IdentError {}

impl IdentError {
    pub fn new(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            segment: None,
            reason: reason.into(),
        }
    }

    pub fn in_segment(
        identifier: impl Into<String>,
        segment: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            segment: Some(segment.into()),
            reason: reason.into(),
        }
    }
}

/// Discriminator for [`ValidationError`] so callers can switch on the kind
/// of failure rather than catch-by-type, and decide whether a retry with
/// `force` is worth offering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    DuplicatedTitle,
    TitleMismatch,
    IllegalRebind,
    WorkflowRegression,
    InvalidIdentifier,
}

impl ValidationKind {
    /// Whether `force` may ever bypass this kind of failure.
    ///
    /// Syntax failures are categorically exempt; the remaining kinds are
    /// business rules whose individual checks decide bypassability.
    pub fn force_eligible(&self) -> bool {
        !matches!(self, Self::InvalidIdentifier)
    }
}

impl std::fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DuplicatedTitle => "duplicated-title",
            Self::TitleMismatch => "title-mismatch",
            Self::IllegalRebind => "illegal-rebind",
            Self::WorkflowRegression => "workflow-regression",
            Self::InvalidIdentifier => "invalid-identifier",
        };
        write!(f, "{name}")
    }
}

/// Business-rule failures surfaced by the workflow gate.
///
/// A closed, tagged set rather than an open hierarchy: every variant is a
/// distinct named condition, and [`ValidationError::kind`] gives callers a
/// discriminator to switch on. Validation failures are never retried
/// automatically — they represent a caller or data error and are surfaced
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The candidate's title is already carried by a different identifier
    /// that has a DOI minted.
    #[error("title {title:?} already belongs to {existing_identifier} (candidate {identifier})")]
    DuplicatedTitle {
        title: String,
        identifier: String,
        existing_identifier: String,
    },

    /// The product kind token does not appear in the title.
    #[error("title {title:?} does not mention product kind {kind:?} ({identifier})")]
    TitleMismatch {
        title: String,
        identifier: String,
        kind: String,
    },

    /// A DOI would be re-associated in a way that breaks provider-side
    /// consistency.
    #[error("cannot rebind DOI {doi} for {identifier}: {reason}")]
    IllegalRebind {
        doi: String,
        identifier: String,
        reason: String,
    },

    /// The candidate's status ranks below the identifier's current status.
    #[error("workflow regression for {identifier}: {current} -> {requested}")]
    WorkflowRegression {
        identifier: String,
        current: LifecycleStatus,
        requested: LifecycleStatus,
    },

    /// The candidate identifier failed syntax validation.
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentError),
}

impl ValidationError {
    pub fn kind(&self) -> ValidationKind {
        match self {
            Self::DuplicatedTitle { .. } => ValidationKind::DuplicatedTitle,
            Self::TitleMismatch { .. } => ValidationKind::TitleMismatch,
            Self::IllegalRebind { .. } => ValidationKind::IllegalRebind,
            Self::WorkflowRegression { .. } => ValidationKind::WorkflowRegression,
            Self::InvalidIdentifier(_) => ValidationKind::InvalidIdentifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_discriminator_matches_variant() {
        let err = ValidationError::WorkflowRegression {
            identifier: "urn:x:y:z".into(),
            current: LifecycleStatus::Findable,
            requested: LifecycleStatus::Draft,
        };
        assert_eq!(err.kind(), ValidationKind::WorkflowRegression);
        assert!(err.kind().force_eligible());
    }

    #[test]
    fn invalid_identifier_is_never_force_eligible() {
        let err: ValidationError = IdentError::new("bad id", "whitespace").into();
        assert_eq!(err.kind(), ValidationKind::InvalidIdentifier);
        assert!(!err.kind().force_eligible());
    }

    #[test]
    fn ident_error_display_names_segment() {
        let err = IdentError::in_segment("urn:x:b@d:z", "b@d", "forbidden character");
        let msg = err.to_string();
        assert!(msg.contains("b@d"));
        assert!(msg.contains("forbidden character"));
    }
}
