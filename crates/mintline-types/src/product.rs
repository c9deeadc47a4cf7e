use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Classification of the data product an identifier names.
///
/// The canonical token is expected to appear in the product's title; the
/// gate's title-kind stage enforces this. Free-text specialization lives in
/// `DoiRecord::product_subkind`, not here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Bundle,
    Collection,
    Document,
    Dataset,
    Other,
}

impl ProductKind {
    /// Canonical lowercase token, as stored in the persisted schema.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Bundle => "bundle",
            Self::Collection => "collection",
            Self::Document => "document",
            Self::Dataset => "dataset",
            Self::Other => "other",
        }
    }

    pub fn all() -> [ProductKind; 5] {
        [
            Self::Bundle,
            Self::Collection,
            Self::Document,
            Self::Dataset,
            Self::Other,
        ]
    }
}

impl Default for ProductKind {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for ProductKind {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|kind| kind.token() == normalized)
            .ok_or_else(|| TokenError {
                token: s.to_string(),
                expected: "product kind",
            })
    }
}
