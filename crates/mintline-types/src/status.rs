use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Workflow state of an identifier as recorded in the ledger.
///
/// The first seven states form a fixed rank ordering
/// (`unknown < reserved < draft < review < pending < registered < findable`)
/// used to detect illegal workflow regressions. `Error` and `Deactivated`
/// sit outside the ordering: they are reachable from any rank and any rank
/// may follow them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Unknown,
    Reserved,
    Draft,
    Review,
    Pending,
    Registered,
    Findable,
    Error,
    Deactivated,
}

impl LifecycleStatus {
    /// Integer rank in the workflow ordering, or `None` for the side
    /// states `Error` and `Deactivated`.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Self::Unknown => Some(0),
            Self::Reserved => Some(1),
            Self::Draft => Some(2),
            Self::Review => Some(3),
            Self::Pending => Some(4),
            Self::Registered => Some(5),
            Self::Findable => Some(6),
            Self::Error | Self::Deactivated => None,
        }
    }

    /// Canonical lowercase token, as stored in the persisted schema.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Reserved => "reserved",
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Pending => "pending",
            Self::Registered => "registered",
            Self::Findable => "findable",
            Self::Error => "error",
            Self::Deactivated => "deactivated",
        }
    }

    /// All statuses in rank order, side states last.
    pub fn all() -> [LifecycleStatus; 9] {
        [
            Self::Unknown,
            Self::Reserved,
            Self::Draft,
            Self::Review,
            Self::Pending,
            Self::Registered,
            Self::Findable,
            Self::Error,
            Self::Deactivated,
        ]
    }
}

impl Default for LifecycleStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for LifecycleStatus {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|status| status.token() == normalized)
            .ok_or_else(|| TokenError {
                token: s.to_string(),
                expected: "lifecycle status",
            })
    }
}
