use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{ArchiveError, ArchiveResult};

/// Location of one transaction's archived payloads: the owning node plus
/// a filesystem-safe UTC second stamp, rendered as `node/stamp`.
///
/// This rendering is what ledger rows carry in `transaction_key`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArchiveKey {
    node_id: String,
    stamp: String,
}

impl ArchiveKey {
    /// Build the key for a transaction at the given moment.
    pub fn from_moment(node_id: &str, moment: DateTime<Utc>) -> ArchiveResult<Self> {
        validate_node_id(node_id)?;
        Ok(Self {
            node_id: node_id.to_string(),
            stamp: moment.format("%Y%m%dT%H%M%SZ").to_string(),
        })
    }

    /// Parse a `node/stamp` rendering back into a key.
    pub fn parse(raw: &str) -> ArchiveResult<Self> {
        match raw.split('/').collect::<Vec<_>>().as_slice() {
            [node_id, stamp] if !stamp.is_empty() => {
                validate_node_id(node_id)?;
                Ok(Self {
                    node_id: node_id.to_string(),
                    stamp: stamp.to_string(),
                })
            }
            _ => Err(ArchiveError::InvalidKey(format!(
                "expected node/stamp, got {raw:?}"
            ))),
        }
    }

    /// The same key with a numeric collision suffix appended.
    pub fn with_suffix(&self, n: u32) -> Self {
        Self {
            node_id: self.node_id.clone(),
            stamp: format!("{}-{n}", self.stamp),
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn stamp(&self) -> &str {
        &self.stamp
    }
}

impl fmt::Display for ArchiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.node_id, self.stamp)
    }
}

fn validate_node_id(node_id: &str) -> ArchiveResult<()> {
    if node_id.is_empty() {
        return Err(ArchiveError::InvalidKey("node id must not be empty".into()));
    }
    if node_id
        .chars()
        .any(|c| !matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-'))
    {
        return Err(ArchiveError::InvalidKey(format!(
            "node id {node_id:?} contains forbidden characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn key_renders_node_and_second_stamp() {
        let moment = Utc.with_ymd_and_hms(2021, 3, 9, 12, 30, 45).unwrap();
        let key = ArchiveKey::from_moment("img", moment).unwrap();
        assert_eq!(key.to_string(), "img/20210309T123045Z");
    }

    #[test]
    fn parse_roundtrip() {
        let key = ArchiveKey::parse("geo/20210309T123045Z-2").unwrap();
        assert_eq!(key.node_id(), "geo");
        assert_eq!(key.stamp(), "20210309T123045Z-2");
        assert_eq!(ArchiveKey::parse(&key.to_string()).unwrap(), key);
    }

    #[test]
    fn parse_rejects_malformed_renderings() {
        assert!(ArchiveKey::parse("no-slash").is_err());
        assert!(ArchiveKey::parse("too/many/parts").is_err());
        assert!(ArchiveKey::parse("img/").is_err());
        assert!(ArchiveKey::parse("/stamp").is_err());
    }

    #[test]
    fn node_ids_with_path_characters_are_rejected() {
        let moment = Utc.with_ymd_and_hms(2021, 3, 9, 12, 30, 45).unwrap();
        assert!(ArchiveKey::from_moment("../escape", moment).is_err());
        assert!(ArchiveKey::from_moment("a/b", moment).is_err());
        assert!(ArchiveKey::from_moment("", moment).is_err());
    }

    #[test]
    fn suffix_disambiguates_collisions() {
        let moment = Utc.with_ymd_and_hms(2021, 3, 9, 12, 30, 45).unwrap();
        let key = ArchiveKey::from_moment("img", moment).unwrap();
        assert_eq!(key.with_suffix(1).to_string(), "img/20210309T123045Z-1");
    }
}
