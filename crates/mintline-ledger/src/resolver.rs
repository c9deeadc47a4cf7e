use mintline_types::DoiRecord;

use crate::error::LedgerResult;
use crate::query::Criteria;
use crate::traits::LedgerStore;

/// Latest-state query layer over a [`LedgerStore`].
///
/// Every lookup hits the backing store directly — there is no cache, since
/// record volume is modest and a stale answer here would itself cause
/// workflow-order violations.
pub struct StateResolver<'a> {
    store: &'a dyn LedgerStore,
}

impl<'a> StateResolver<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self { store }
    }

    /// The newest latest-row matching an identifier token (exact or
    /// wildcard).
    pub fn latest_of(&self, token: &str) -> LedgerResult<Option<DoiRecord>> {
        let rows = self.store.query(&Criteria::new().with_ids([token]))?;
        Ok(newest(rows))
    }

    /// The latest row binding the given DOI, if any.
    pub fn latest_by_doi(&self, doi: &str) -> LedgerResult<Option<DoiRecord>> {
        let rows = self.store.query(&Criteria::new().with_dois([doi]))?;
        Ok(newest(rows))
    }

    /// The latest row carrying the given title (case-insensitive exact
    /// match), if any.
    pub fn latest_by_title(&self, title: &str) -> LedgerResult<Option<DoiRecord>> {
        let rows = self.store.query(&Criteria::new().with_titles([title]))?;
        Ok(newest(rows))
    }

    /// Every identifier's current row.
    pub fn all_latest(&self) -> LedgerResult<Vec<DoiRecord>> {
        self.store.query(&Criteria::new())
    }
}

fn newest(rows: Vec<DoiRecord>) -> Option<DoiRecord> {
    rows.into_iter().max_by_key(|r| r.date_added)
}
