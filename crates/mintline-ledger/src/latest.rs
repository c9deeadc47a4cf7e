//! Latest-row derivation shared by every store backend.
//!
//! An append is planned against the current row set, committed to durable
//! storage, then applied to the in-memory rows. Splitting plan from apply
//! lets the file backend write the fully-flagged row to disk before any
//! in-memory state changes, so a failed write leaves no phantom row.

use mintline_types::{DoiRecord, ProductId};

use crate::traits::Appended;

/// The flag changes one append implies.
pub(crate) struct AppendPlan {
    /// Whether the new row becomes its identifier's latest. False only
    /// when a superseding row with a later `date_added` already exists
    /// (a backfilled historical row).
    pub new_is_latest: bool,
    /// Indices of existing rows whose `is_latest` flag this append clears.
    pub clear: Vec<usize>,
}

pub(crate) fn plan(rows: &[DoiRecord], candidate: &DoiRecord) -> AppendPlan {
    let candidate_id = ProductId::parse(&candidate.identifier).ok();
    let mut new_is_latest = true;
    let mut clear = Vec::new();

    for (index, existing) in rows.iter().enumerate() {
        if !same_line(candidate_id.as_ref(), &candidate.identifier, existing) {
            continue;
        }
        if existing.date_added > candidate.date_added {
            // A newer row already holds the line; the candidate is history.
            new_is_latest = false;
        } else if existing.is_latest {
            clear.push(index);
        }
    }

    AppendPlan {
        new_is_latest,
        clear,
    }
}

pub(crate) fn apply(rows: &mut Vec<DoiRecord>, mut row: DoiRecord, plan: AppendPlan) -> Appended {
    for index in plan.clear {
        rows[index].is_latest = false;
    }
    row.is_latest = plan.new_is_latest;
    rows.push(row.clone());
    Appended {
        seq: rows.len() as u64,
        row,
    }
}

/// Whether `existing` sits on the same logical line as the candidate:
/// same base and equal versions, or an unversioned predecessor. Falls back
/// to exact string comparison when either identifier fails to parse.
fn same_line(candidate_id: Option<&ProductId>, candidate_raw: &str, existing: &DoiRecord) -> bool {
    match (candidate_id, existing.parsed_identifier().ok()) {
        (Some(candidate), Some(existing)) => candidate.supersedes(&existing),
        _ => candidate_raw == existing.identifier,
    }
}
