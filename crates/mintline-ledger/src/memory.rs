use std::sync::RwLock;

use mintline_types::DoiRecord;

use crate::error::LedgerResult;
use crate::latest;
use crate::query::Criteria;
use crate::traits::{Appended, LedgerStore};

/// In-memory ledger for tests and embedding.
///
/// Rows are held behind a `RwLock`; the append read-modify-write runs under
/// the write half, which gives the same serializable guarantee the file
/// backend gets from its advisory lock.
pub struct InMemoryLedger {
    rows: RwLock<Vec<DoiRecord>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().expect("ledger lock poisoned").is_empty()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedger {
    fn append(&self, row: DoiRecord) -> LedgerResult<Appended> {
        let mut rows = self.rows.write().expect("ledger lock poisoned");
        let plan = latest::plan(&rows, &row);
        Ok(latest::apply(&mut rows, row, plan))
    }

    fn query(&self, criteria: &Criteria) -> LedgerResult<Vec<DoiRecord>> {
        let rows = self.rows.read().expect("ledger lock poisoned");
        Ok(rows.iter().filter(|r| criteria.matches(r)).cloned().collect())
    }

    fn row_count(&self) -> LedgerResult<u64> {
        Ok(self.rows.read().expect("ledger lock poisoned").len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mintline_types::{LifecycleStatus, ProductKind};

    use super::*;

    fn row(identifier: &str, status: LifecycleStatus, added_secs: i64) -> DoiRecord {
        DoiRecord {
            identifier: identifier.into(),
            status,
            date_added: Utc.timestamp_opt(added_secs, 0).unwrap(),
            date_updated: Utc.timestamp_opt(added_secs, 0).unwrap(),
            submitter: "submitter@example.org".into(),
            title: format!("{identifier} bundle"),
            product_kind: ProductKind::Bundle,
            product_subkind: String::new(),
            node_id: "img".into(),
            doi: None,
            transaction_key: format!("img/{added_secs}"),
            is_latest: true,
        }
    }

    #[test]
    fn single_latest_invariant_over_appends() {
        let ledger = InMemoryLedger::new();
        let id = "urn:nasa:pds:insight_cameras::1.0";

        for (step, secs) in [1_000, 2_000, 3_000].iter().enumerate() {
            ledger.append(row(id, LifecycleStatus::Draft, *secs)).unwrap();
            let latest = ledger
                .query(&Criteria::new().with_ids([id]))
                .unwrap();
            assert_eq!(latest.len(), 1, "after append {}", step + 1);
            assert_eq!(latest[0].date_added.timestamp(), *secs);
        }
        assert_eq!(ledger.row_count().unwrap(), 3);
    }

    #[test]
    fn history_query_returns_every_row() {
        let ledger = InMemoryLedger::new();
        let id = "urn:nasa:pds:insight_cameras::1.0";
        ledger.append(row(id, LifecycleStatus::Reserved, 1_000)).unwrap();
        ledger.append(row(id, LifecycleStatus::Draft, 2_000)).unwrap();

        let history = ledger
            .query(&Criteria::new().with_ids([id]).include_history())
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().filter(|r| r.is_latest).count(), 1);
    }

    #[test]
    fn distinct_versions_stay_independently_latest() {
        let ledger = InMemoryLedger::new();
        ledger
            .append(row("urn:nasa:pds:a::1.0", LifecycleStatus::Draft, 1_000))
            .unwrap();
        ledger
            .append(row("urn:nasa:pds:a::2.0", LifecycleStatus::Draft, 2_000))
            .unwrap();
        ledger
            .append(row("urn:nasa:pds:b::1.0", LifecycleStatus::Draft, 3_000))
            .unwrap();

        let all_a = ledger
            .query(&Criteria::new().with_ids(["urn:nasa:pds:a::*"]))
            .unwrap();
        assert_eq!(all_a.len(), 2);

        let v1 = ledger
            .query(&Criteria::new().with_ids(["urn:nasa:pds:*::1.0"]))
            .unwrap();
        let mut ids: Vec<&str> = v1.iter().map(|r| r.identifier.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["urn:nasa:pds:a::1.0", "urn:nasa:pds:b::1.0"]);
    }

    #[test]
    fn versioned_row_supersedes_unversioned_predecessor() {
        let ledger = InMemoryLedger::new();
        ledger
            .append(row("urn:nasa:pds:a", LifecycleStatus::Reserved, 1_000))
            .unwrap();
        ledger
            .append(row("urn:nasa:pds:a::1.0", LifecycleStatus::Draft, 2_000))
            .unwrap();

        let latest = ledger
            .query(&Criteria::new().with_ids(["urn:nasa:pds:a*"]))
            .unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].identifier, "urn:nasa:pds:a::1.0");
    }

    #[test]
    fn backfilled_older_row_does_not_steal_latest() {
        let ledger = InMemoryLedger::new();
        let id = "urn:nasa:pds:a::1.0";
        ledger.append(row(id, LifecycleStatus::Registered, 5_000)).unwrap();
        let appended = ledger.append(row(id, LifecycleStatus::Draft, 1_000)).unwrap();

        assert!(!appended.row.is_latest);
        let latest = ledger.query(&Criteria::new().with_ids([id])).unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].status, LifecycleStatus::Registered);
    }

    #[test]
    fn zero_matches_is_empty_not_error() {
        let ledger = InMemoryLedger::new();
        let rows = ledger
            .query(&Criteria::new().with_ids(["urn:nasa:pds:absent::*"]))
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn append_assigns_monotonic_positions() {
        let ledger = InMemoryLedger::new();
        let a = ledger
            .append(row("urn:nasa:pds:a::1.0", LifecycleStatus::Draft, 1_000))
            .unwrap();
        let b = ledger
            .append(row("urn:nasa:pds:b::1.0", LifecycleStatus::Draft, 2_000))
            .unwrap();
        assert_eq!(a.seq, 1);
        assert_eq!(b.seq, 2);
    }
}
