use chrono::{DateTime, Utc};
use mintline_types::{wild_match, DoiRecord, LifecycleStatus};
use serde::{Deserialize, Serialize};

/// Inclusive time bounds; either side may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn is_unbounded(&self) -> bool {
        self.after.is_none() && self.before.is_none()
    }

    pub fn contains(&self, moment: DateTime<Utc>) -> bool {
        if let Some(after) = self.after {
            if moment < after {
                return false;
            }
        }
        if let Some(before) = self.before {
            if moment > before {
                return false;
            }
        }
        true
    }
}

/// A conjunction of per-field predicates over ledger rows.
///
/// Absence of a field means "no filter on that field". Identifier tokens
/// may carry `*` wildcards (glob-style, not regex), so callers can select
/// all versions of a logical identifier or one specific version uniformly.
/// Only latest rows match unless [`Criteria::include_history`] is set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    pub ids: Option<Vec<String>>,
    pub statuses: Option<Vec<LifecycleStatus>>,
    pub submitters: Option<Vec<String>>,
    pub nodes: Option<Vec<String>>,
    pub dois: Option<Vec<String>>,
    pub titles: Option<Vec<String>>,
    pub added: TimeRange,
    pub updated: TimeRange,
    pub with_history: bool,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_statuses<I>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = LifecycleStatus>,
    {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    pub fn with_submitters<I, S>(mut self, submitters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.submitters = Some(submitters.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes = Some(nodes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_dois<I, S>(mut self, dois: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dois = Some(dois.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.titles = Some(titles.into_iter().map(Into::into).collect());
        self
    }

    pub fn added_after(mut self, moment: DateTime<Utc>) -> Self {
        self.added.after = Some(moment);
        self
    }

    pub fn added_before(mut self, moment: DateTime<Utc>) -> Self {
        self.added.before = Some(moment);
        self
    }

    pub fn updated_after(mut self, moment: DateTime<Utc>) -> Self {
        self.updated.after = Some(moment);
        self
    }

    pub fn updated_before(mut self, moment: DateTime<Utc>) -> Self {
        self.updated.before = Some(moment);
        self
    }

    /// Return historical rows as well, not just each identifier's latest.
    pub fn include_history(mut self) -> Self {
        self.with_history = true;
        self
    }

    /// Whether a row satisfies every predicate in this criteria object.
    pub fn matches(&self, row: &DoiRecord) -> bool {
        if !self.with_history && !row.is_latest {
            return false;
        }
        if let Some(ids) = &self.ids {
            let identifier = row.identifier.to_ascii_lowercase();
            if !ids
                .iter()
                .any(|token| wild_match(&identifier, &token.trim().to_ascii_lowercase()))
            {
                return false;
            }
        }
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&row.status) {
                return false;
            }
        }
        if let Some(submitters) = &self.submitters {
            if !submitters.iter().any(|s| s == &row.submitter) {
                return false;
            }
        }
        if let Some(nodes) = &self.nodes {
            if !nodes.iter().any(|n| n == &row.node_id) {
                return false;
            }
        }
        if let Some(dois) = &self.dois {
            match &row.doi {
                Some(doi) => {
                    if !dois.iter().any(|d| d == doi) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        if let Some(titles) = &self.titles {
            if !titles
                .iter()
                .any(|t| t.eq_ignore_ascii_case(&row.title))
            {
                return false;
            }
        }
        self.added.contains(row.date_added) && self.updated.contains(row.date_updated)
    }
}
