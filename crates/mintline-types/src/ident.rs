//! Product identifier syntax: validation, normalization, and wildcard
//! matching.
//!
//! Identifiers follow a fixed colon-delimited namespace scheme with an
//! optional double-colon version suffix:
//!
//! ```text
//! urn:<agency>:<archive>:<bundle>[:<collection>[:<product>]][::M[.m]]
//! ```
//!
//! Rules:
//! - 4 to 6 colon-separated segments, the first of which must be `urn`
//! - Each segment is non-empty, drawn from `[a-z0-9._-]` after lowercase
//!   normalization, and must not begin or end with `.`
//! - The version suffix, when present, is one or two dot-separated decimal
//!   components (`1`, `1.0`, `12.34`)
//! - The normalized identifier is at most [`MAX_IDENTIFIER_LENGTH`] bytes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdentError;

/// Maximum byte length of a normalized identifier, version included.
pub const MAX_IDENTIFIER_LENGTH: usize = 255;

const MIN_SEGMENTS: usize = 4;
const MAX_SEGMENTS: usize = 6;

/// Version suffix of an identifier: one or two decimal components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vid {
    pub major: u64,
    pub minor: Option<u64>,
}

impl fmt::Display for Vid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minor {
            Some(minor) => write!(f, "{}.{}", self.major, minor),
            None => write!(f, "{}", self.major),
        }
    }
}

/// A validated, normalized product identifier.
///
/// Construction goes through [`ProductId::parse`] only, so a `ProductId`
/// value is always well-formed. Parsing is a pure function with no I/O.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProductId {
    segments: Vec<String>,
    version: Option<Vid>,
}

impl ProductId {
    /// Validate and normalize an identifier string.
    ///
    /// Normalization trims surrounding whitespace and lowercases the
    /// identifier; the canonical form is what [`fmt::Display`] renders.
    ///
    /// # Examples
    ///
    /// ```
    /// use mintline_types::ProductId;
    ///
    /// let id = ProductId::parse(" URN:nasa:pds:insight_cameras::1.0 ").unwrap();
    /// assert_eq!(id.to_string(), "urn:nasa:pds:insight_cameras::1.0");
    /// assert_eq!(id.base(), "urn:nasa:pds:insight_cameras");
    /// assert!(ProductId::parse("urn:nasa:pds").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, IdentError> {
        let normalized = input.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(IdentError::new(input, "identifier must not be empty"));
        }
        if normalized.len() > MAX_IDENTIFIER_LENGTH {
            return Err(IdentError::new(
                input,
                format!(
                    "identifier exceeds {MAX_IDENTIFIER_LENGTH} bytes ({} bytes)",
                    normalized.len()
                ),
            ));
        }

        let parts: Vec<&str> = normalized.split("::").collect();
        let (base, version) = match parts.as_slice() {
            [base] => (*base, None),
            [base, version] => (*base, Some(parse_vid(&normalized, version)?)),
            _ => {
                return Err(IdentError::new(
                    input,
                    "identifier must contain at most one '::' version separator",
                ))
            }
        };

        let segments: Vec<&str> = base.split(':').collect();
        if segments.len() < MIN_SEGMENTS || segments.len() > MAX_SEGMENTS {
            return Err(IdentError::new(
                input,
                format!(
                    "expected {MIN_SEGMENTS} to {MAX_SEGMENTS} segments, found {}",
                    segments.len()
                ),
            ));
        }
        if segments[0] != "urn" {
            return Err(IdentError::in_segment(
                input,
                segments[0],
                "identifier must begin with the 'urn' segment",
            ));
        }
        for segment in &segments {
            validate_segment(&normalized, segment)?;
        }

        Ok(Self {
            segments: segments.into_iter().map(str::to_string).collect(),
            version,
        })
    }

    /// The identifier without its version suffix.
    pub fn base(&self) -> String {
        self.segments.join(":")
    }

    /// The colon-separated segments of the base identifier.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The version suffix, if present.
    pub fn version(&self) -> Option<&Vid> {
        self.version.as_ref()
    }

    pub fn is_versioned(&self) -> bool {
        self.version.is_some()
    }

    /// Whether a row carrying `self` supersedes a row carrying `other`.
    ///
    /// True when the two share a base and either the versions are equal or
    /// `other` carries no version: an unversioned row is superseded by any
    /// versioned successor of the same base, while distinct versions remain
    /// independently current.
    pub fn supersedes(&self, other: &ProductId) -> bool {
        if self.segments != other.segments {
            return false;
        }
        other.version.is_none() || self.version == other.version
    }

    /// Glob-style wildcard match between this identifier and a query token.
    ///
    /// A `*` in either the identifier or the token matches any run of
    /// characters at that position. This is glob matching, not regex:
    /// `ns:a::*` selects every version of `ns:a`, and `ns:*::1.0` selects
    /// version 1.0 of every `ns:`-prefixed product.
    pub fn matches_token(&self, token: &str) -> bool {
        wild_match(&self.to_string(), &token.trim().to_ascii_lowercase())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base())?;
        if let Some(vid) = &self.version {
            write!(f, "::{vid}")?;
        }
        Ok(())
    }
}

impl FromStr for ProductId {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ProductId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn validate_segment(identifier: &str, segment: &str) -> Result<(), IdentError> {
    if segment.is_empty() {
        return Err(IdentError::new(identifier, "segments must not be empty"));
    }
    if let Some(bad) = segment
        .chars()
        .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '-'))
    {
        return Err(IdentError::in_segment(
            identifier,
            segment,
            format!("forbidden character {bad:?}"),
        ));
    }
    if segment.starts_with('.') || segment.ends_with('.') {
        return Err(IdentError::in_segment(
            identifier,
            segment,
            "segment must not begin or end with '.'",
        ));
    }
    Ok(())
}

fn parse_vid(identifier: &str, version: &str) -> Result<Vid, IdentError> {
    let components: Vec<&str> = version.split('.').collect();
    if components.len() > 2 {
        return Err(IdentError::in_segment(
            identifier,
            version,
            "version must have one or two dot-separated components",
        ));
    }
    let mut numbers = components.iter().map(|c| {
        if c.is_empty() || !c.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(IdentError::in_segment(
                identifier,
                version,
                format!("version component {c:?} is not a decimal number"),
            ));
        }
        c.parse::<u64>().map_err(|_| {
            IdentError::in_segment(identifier, version, format!("version component {c:?} overflows"))
        })
    });
    let major = numbers.next().expect("split yields at least one component")?;
    let minor = numbers.next().transpose()?;
    Ok(Vid { major, minor })
}

/// Glob-style wildcard match where `*` in **either** operand matches any
/// run of characters in the other. Comparison is case-sensitive; callers
/// normalize first.
pub fn wild_match(a: &str, b: &str) -> bool {
    glob_match(a, b) || glob_match(b, a)
}

/// One-directional glob match: `*` in `pattern` matches any run in `text`;
/// every other character is literal.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            // Backtrack: let the last `*` absorb one more character.
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let id = ProductId::parse("  URN:NASA:pds:Insight_Cameras::2.1 ").unwrap();
        assert_eq!(id.to_string(), "urn:nasa:pds:insight_cameras::2.1");
        assert_eq!(id.segments().len(), 4);
        assert_eq!(id.version(), Some(&Vid { major: 2, minor: Some(1) }));
    }

    #[test]
    fn parse_accepts_unversioned() {
        let id = ProductId::parse("urn:nasa:pds:mars2020.images:data:sol0001").unwrap();
        assert!(!id.is_versioned());
        assert_eq!(id.base(), id.to_string());
    }

    #[test]
    fn parse_accepts_single_component_version() {
        let id = ProductId::parse("urn:esa:psa:bepi_mag::3").unwrap();
        assert_eq!(id.version(), Some(&Vid { major: 3, minor: None }));
        assert_eq!(id.to_string(), "urn:esa:psa:bepi_mag::3");
    }

    #[test]
    fn parse_rejects_bad_segment_counts() {
        assert!(ProductId::parse("urn:nasa:pds").is_err());
        assert!(ProductId::parse("urn:a:b:c:d:e:f").is_err());
    }

    #[test]
    fn parse_rejects_missing_urn_prefix() {
        let err = ProductId::parse("nasa:pds:insight:cameras").unwrap_err();
        assert_eq!(err.segment.as_deref(), Some("nasa"));
    }

    #[test]
    fn parse_rejects_forbidden_characters_naming_segment() {
        let err = ProductId::parse("urn:nasa:pds:in sight").unwrap_err();
        assert_eq!(err.segment.as_deref(), Some("in sight"));

        let err = ProductId::parse("urn:nasa:pds:data/raw").unwrap_err();
        assert_eq!(err.segment.as_deref(), Some("data/raw"));
    }

    #[test]
    fn parse_rejects_dotted_segment_edges() {
        assert!(ProductId::parse("urn:nasa:pds:.hidden").is_err());
        assert!(ProductId::parse("urn:nasa:pds:trailing.").is_err());
        assert!(ProductId::parse("urn:nasa:pds:mid.dle").is_ok());
    }

    #[test]
    fn parse_rejects_empty_segments() {
        assert!(ProductId::parse("urn:nasa::pds:x").is_err());
        assert!(ProductId::parse("urn:nasa:pds:x:").is_err());
    }

    #[test]
    fn parse_rejects_malformed_versions() {
        assert!(ProductId::parse("urn:nasa:pds:x::1.0.0").is_err());
        assert!(ProductId::parse("urn:nasa:pds:x::v1").is_err());
        assert!(ProductId::parse("urn:nasa:pds:x::1.").is_err());
        assert!(ProductId::parse("urn:nasa:pds:x::").is_err());
        assert!(ProductId::parse("urn:nasa:pds:x::1::2").is_err());
    }

    #[test]
    fn parse_enforces_length_cap() {
        let long = format!("urn:nasa:pds:{}", "a".repeat(MAX_IDENTIFIER_LENGTH));
        assert!(ProductId::parse(&long).is_err());
    }

    #[test]
    fn supersedes_same_version_and_unversioned_predecessor() {
        let v1 = ProductId::parse("urn:nasa:pds:x::1.0").unwrap();
        let v1_again = ProductId::parse("urn:nasa:pds:x::1.0").unwrap();
        let v2 = ProductId::parse("urn:nasa:pds:x::2.0").unwrap();
        let bare = ProductId::parse("urn:nasa:pds:x").unwrap();
        let other = ProductId::parse("urn:nasa:pds:y::1.0").unwrap();

        assert!(v1.supersedes(&v1_again));
        assert!(v1.supersedes(&bare));
        assert!(!v1.supersedes(&v2));
        assert!(!v2.supersedes(&v1));
        assert!(!v1.supersedes(&other));
        assert!(bare.supersedes(&bare.clone()));
        assert!(!bare.supersedes(&v1));
    }

    #[test]
    fn wildcard_selects_all_versions() {
        let a1 = ProductId::parse("urn:nasa:pds:a::1.0").unwrap();
        let a2 = ProductId::parse("urn:nasa:pds:a::2.0").unwrap();
        let b1 = ProductId::parse("urn:nasa:pds:b::1.0").unwrap();

        assert!(a1.matches_token("urn:nasa:pds:a::*"));
        assert!(a2.matches_token("urn:nasa:pds:a::*"));
        assert!(!b1.matches_token("urn:nasa:pds:a::*"));
    }

    #[test]
    fn wildcard_selects_one_version_across_products() {
        let a1 = ProductId::parse("urn:nasa:pds:a::1.0").unwrap();
        let a2 = ProductId::parse("urn:nasa:pds:a::2.0").unwrap();
        let b1 = ProductId::parse("urn:nasa:pds:b::1.0").unwrap();

        assert!(a1.matches_token("urn:nasa:pds:*::1.0"));
        assert!(b1.matches_token("urn:nasa:pds:*::1.0"));
        assert!(!a2.matches_token("urn:nasa:pds:*::1.0"));
    }

    #[test]
    fn exact_token_matches_exactly() {
        let a1 = ProductId::parse("urn:nasa:pds:a::1.0").unwrap();
        assert!(a1.matches_token("urn:nasa:pds:a::1.0"));
        assert!(a1.matches_token(" URN:nasa:pds:a::1.0 "));
        assert!(!a1.matches_token("urn:nasa:pds:a"));
    }

    #[test]
    fn wild_match_is_symmetric_in_the_starred_operand() {
        assert!(wild_match("urn:nasa:pds:a::*", "urn:nasa:pds:a::1.0"));
        assert!(wild_match("urn:nasa:pds:a::1.0", "urn:nasa:pds:a::*"));
        assert!(wild_match("*", ""));
        assert!(!wild_match("urn:a", "urn:b"));
    }

    #[test]
    fn glob_backtracks_through_repeated_prefixes() {
        assert!(wild_match("urn:*:pds:*:data", "urn:nasa:pds:mission:data"));
        assert!(!wild_match("urn:*:pds:*:data", "urn:nasa:psa:mission:data"));
        assert!(wild_match("*data*", "urn:nasa:pds:dataset"));
    }

    #[test]
    fn serde_roundtrip_preserves_canonical_form() {
        let id = ProductId::parse("urn:nasa:pds:insight_cameras::1.0").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"urn:nasa:pds:insight_cameras::1.0\"");
        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_malformed_input() {
        assert!(serde_json::from_str::<ProductId>("\"not an id\"").is_err());
    }

    proptest! {
        #[test]
        fn parse_display_roundtrip(
            segs in proptest::collection::vec("[a-z0-9_-]{1,12}", 3..=5),
            version in proptest::option::of((0u64..10_000, proptest::option::of(0u64..10_000))),
        ) {
            let mut raw = format!("urn:{}", segs.join(":"));
            if let Some((major, minor)) = version {
                raw.push_str(&format!("::{major}"));
                if let Some(minor) = minor {
                    raw.push_str(&format!(".{minor}"));
                }
            }
            let parsed = ProductId::parse(&raw).unwrap();
            prop_assert_eq!(parsed.to_string(), raw.clone());
            let reparsed = ProductId::parse(&parsed.to_string()).unwrap();
            prop_assert_eq!(parsed, reparsed);
        }

        #[test]
        fn literal_wild_match_is_equality(a in "[a-z0-9:._-]{0,24}", b in "[a-z0-9:._-]{0,24}") {
            prop_assert_eq!(wild_match(&a, &b), a == b);
        }
    }
}
