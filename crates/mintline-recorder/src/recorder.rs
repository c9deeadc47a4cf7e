use chrono::Utc;
use mintline_archive::TransactionArchive;
use mintline_gate::WorkflowGate;
use mintline_ledger::{LedgerStore, StateResolver};
use mintline_types::{DoiRecord, ProductId, ValidationError};
use tracing::{debug, info};

use crate::error::RecordError;

/// Orchestrates validate-then-write for one ledger.
///
/// Upstream adapters (format parsers, provider clients) hand this a
/// fully-populated candidate plus the raw request/response payload pair;
/// downstream consumers only ever see [`DoiRecord`] values or
/// [`RecordError`] kinds.
pub struct TransactionRecorder<S, A> {
    store: S,
    archive: A,
    gate: WorkflowGate,
}

impl<S: LedgerStore, A: TransactionArchive> TransactionRecorder<S, A> {
    pub fn new(store: S, archive: A, gate: WorkflowGate) -> Self {
        Self {
            store,
            archive,
            gate,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn archive(&self) -> &A {
        &self.archive
    }

    /// Record one transaction.
    ///
    /// The candidate's identifier is normalized and its timestamps and
    /// bookkeeping fields are stamped here — callers do not control
    /// `date_added`, `transaction_key`, or `is_latest`.
    ///
    /// If the candidate is content-identical to the identifier's current
    /// latest row, this is a no-op returning the existing row unchanged:
    /// no payloads are archived and no row is appended.
    ///
    /// Otherwise the workflow gate runs against current ledger state
    /// (`force` bypasses only the business-rule checks that permit it),
    /// the payload pair is archived, and the row is appended — in that
    /// order, so a ledger row can never point at missing archival content.
    pub fn record(
        &self,
        mut candidate: DoiRecord,
        raw_input: &[u8],
        raw_output: &[u8],
        force: bool,
    ) -> Result<DoiRecord, RecordError> {
        let identifier = ProductId::parse(&candidate.identifier)
            .map_err(ValidationError::InvalidIdentifier)?;
        candidate.identifier = identifier.to_string();

        let now = Utc::now();
        candidate.date_added = now;
        candidate.date_updated = now;

        let resolver = StateResolver::new(&self.store);
        if let Some(current) = resolver.latest_of(&candidate.identifier)? {
            if current.same_content(&candidate) {
                debug!(identifier = %candidate.identifier, "identical candidate; returning existing row");
                return Ok(current);
            }
        }

        let report = self.gate.evaluate(&candidate, &self.store, force)?;

        let key = self
            .archive
            .store(&candidate.node_id, now, raw_input, raw_output)?;
        candidate.transaction_key = key.to_string();

        let appended = self.store.append(candidate)?;
        info!(
            seq = appended.seq,
            identifier = %appended.row.identifier,
            status = %appended.row.status,
            bypassed = report.bypassed().len(),
            transaction_key = %appended.row.transaction_key,
            "transaction recorded"
        );
        Ok(appended.row)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mintline_archive::{ArchiveKey, FsArchive, InMemoryArchive};
    use mintline_gate::GateConfig;
    use mintline_ledger::{Criteria, FileLedger, FileLedgerConfig, InMemoryLedger};
    use mintline_types::{LifecycleStatus, ProductKind, ValidationKind};

    use super::*;

    fn candidate(identifier: &str, status: LifecycleStatus, title: &str) -> DoiRecord {
        DoiRecord {
            identifier: identifier.into(),
            status,
            date_added: Utc.timestamp_opt(0, 0).unwrap(),
            date_updated: Utc.timestamp_opt(0, 0).unwrap(),
            submitter: "submitter@example.org".into(),
            title: title.into(),
            product_kind: ProductKind::Bundle,
            product_subkind: "PDS4 Bundle".into(),
            node_id: "img".into(),
            doi: None,
            transaction_key: String::new(),
            is_latest: false,
        }
    }

    fn recorder() -> TransactionRecorder<InMemoryLedger, InMemoryArchive> {
        TransactionRecorder::new(
            InMemoryLedger::new(),
            InMemoryArchive::new(),
            WorkflowGate::with_default_stages(GateConfig::default()),
        )
    }

    #[test]
    fn record_archives_then_appends() {
        let recorder = recorder();
        let row = recorder
            .record(
                candidate("urn:nasa:pds:a::1.0", LifecycleStatus::Reserved, "A Bundle"),
                b"<label/>",
                b"<response/>",
                false,
            )
            .unwrap();

        assert!(row.is_latest);
        assert!(!row.transaction_key.is_empty());

        let key = ArchiveKey::parse(&row.transaction_key).unwrap();
        let payloads = recorder.archive().load(&key).unwrap();
        assert_eq!(payloads.input, b"<label/>");
        assert_eq!(payloads.output, b"<response/>");

        let found = recorder
            .store()
            .query(&Criteria::new().with_ids(["urn:nasa:pds:a::1.0"]))
            .unwrap();
        assert_eq!(found, vec![row]);
    }

    #[test]
    fn identifier_is_normalized_before_anything_else() {
        let recorder = recorder();
        let row = recorder
            .record(
                candidate(" URN:NASA:pds:A::1.0 ", LifecycleStatus::Reserved, "A Bundle"),
                b"",
                b"",
                false,
            )
            .unwrap();
        assert_eq!(row.identifier, "urn:nasa:pds:a::1.0");
    }

    #[test]
    fn malformed_identifier_is_refused_even_with_force() {
        let recorder = recorder();
        let err = recorder
            .record(
                candidate("urn:nasa:bad id", LifecycleStatus::Reserved, "A Bundle"),
                b"",
                b"",
                true,
            )
            .unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::InvalidIdentifier));
        assert_eq!(recorder.store().row_count().unwrap(), 0);
        assert!(recorder.archive().is_empty());
    }

    #[test]
    fn identical_candidate_is_a_no_op() {
        let recorder = recorder();
        let make = || candidate("urn:nasa:pds:a::1.0", LifecycleStatus::Reserved, "A Bundle");

        let first = recorder.record(make(), b"in", b"out", false).unwrap();
        let second = recorder.record(make(), b"in", b"out", false).unwrap();

        assert_eq!(first, second);
        assert_eq!(recorder.store().row_count().unwrap(), 1);
        assert_eq!(recorder.archive().len(), 1);
    }

    #[test]
    fn regression_without_force_leaves_ledger_and_archive_unchanged() {
        let recorder = recorder();
        recorder
            .record(
                candidate("urn:nasa:pds:a::1.0", LifecycleStatus::Registered, "A Bundle"),
                b"in",
                b"out",
                false,
            )
            .unwrap();

        let err = recorder
            .record(
                candidate("urn:nasa:pds:a::1.0", LifecycleStatus::Draft, "A Bundle"),
                b"in2",
                b"out2",
                false,
            )
            .unwrap_err();

        assert_eq!(err.validation_kind(), Some(ValidationKind::WorkflowRegression));
        assert!(!err.is_retryable());
        assert_eq!(recorder.store().row_count().unwrap(), 1);
        assert_eq!(recorder.archive().len(), 1);
    }

    #[test]
    fn regression_with_force_appends() {
        let recorder = recorder();
        recorder
            .record(
                candidate("urn:nasa:pds:a::1.0", LifecycleStatus::Registered, "A Bundle"),
                b"in",
                b"out",
                false,
            )
            .unwrap();

        let row = recorder
            .record(
                candidate("urn:nasa:pds:a::1.0", LifecycleStatus::Draft, "A Bundle"),
                b"in2",
                b"out2",
                true,
            )
            .unwrap();

        assert_eq!(row.status, LifecycleStatus::Draft);
        assert_eq!(recorder.store().row_count().unwrap(), 2);
    }

    #[test]
    fn rebinding_a_minted_doi_fails_even_with_force() {
        let recorder = recorder();
        let mut minted = candidate("urn:nasa:pds:y::1.0", LifecycleStatus::Registered, "Y Bundle");
        minted.doi = Some("10.17189/1001".into());
        recorder.record(minted, b"in", b"out", false).unwrap();

        let mut rebinding = candidate("urn:nasa:pds:z::1.0", LifecycleStatus::Registered, "Z Bundle");
        rebinding.doi = Some("10.17189/1001".into());
        let err = recorder.record(rebinding, b"in", b"out", true).unwrap_err();

        assert_eq!(err.validation_kind(), Some(ValidationKind::IllegalRebind));
        assert_eq!(recorder.store().row_count().unwrap(), 1);
    }

    #[test]
    fn wildcard_queries_span_versions_after_recording() {
        let recorder = recorder();
        for (id, title) in [
            ("urn:nasa:pds:a::1.0", "A v1 Bundle"),
            ("urn:nasa:pds:a::2.0", "A v2 Bundle"),
            ("urn:nasa:pds:b::1.0", "B Bundle"),
        ] {
            recorder
                .record(candidate(id, LifecycleStatus::Reserved, title), b"", b"", false)
                .unwrap();
        }

        let all_a = recorder
            .store()
            .query(&Criteria::new().with_ids(["urn:nasa:pds:a::*"]))
            .unwrap();
        assert_eq!(all_a.len(), 2);

        let v1 = recorder
            .store()
            .query(&Criteria::new().with_ids(["urn:nasa:pds:*::1.0"]))
            .unwrap();
        let mut ids: Vec<&str> = v1.iter().map(|r| r.identifier.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["urn:nasa:pds:a::1.0", "urn:nasa:pds:b::1.0"]);
    }

    #[test]
    fn durable_stack_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let ledger_path = dir.path().join("doi.ledger");

        let recorded = {
            let recorder = TransactionRecorder::new(
                FileLedger::open(&ledger_path, FileLedgerConfig::default()).unwrap(),
                FsArchive::open(&dir.path().join("archive")).unwrap(),
                WorkflowGate::with_default_stages(GateConfig::default()),
            );
            recorder
                .record(
                    candidate("urn:nasa:pds:a::1.0", LifecycleStatus::Reserved, "A Bundle"),
                    b"<label/>",
                    b"<response/>",
                    false,
                )
                .unwrap()
        };

        // A fresh process sees the row and can chase its transaction key.
        let ledger = FileLedger::open(&ledger_path, FileLedgerConfig::default()).unwrap();
        let rows = ledger
            .query(&Criteria::new().with_ids(["urn:nasa:pds:a::*"]))
            .unwrap();
        assert_eq!(rows, vec![recorded.clone()]);

        let archive = FsArchive::open(&dir.path().join("archive")).unwrap();
        let key = ArchiveKey::parse(&recorded.transaction_key).unwrap();
        assert_eq!(archive.load(&key).unwrap().input, b"<label/>");
    }
}
