use mintline_ledger::LedgerError;
use mintline_types::{DoiRecord, ValidationError};

use crate::stage::{GateContext, GateStage, StageDecision};

/// Duplicate-title check.
///
/// Titles must stay unique across identifiers once a DOI is minted for
/// either side of the collision; title reuse on the candidate's own
/// identifier (a metadata update) is always legal.
pub struct DuplicateTitleStage;

impl GateStage for DuplicateTitleStage {
    fn name(&self) -> &str {
        "duplicate-title"
    }

    fn evaluate(
        &self,
        candidate: &DoiRecord,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, LedgerError> {
        let Some(existing) = context.resolver.latest_by_title(&candidate.title)? else {
            return Ok(StageDecision::Pass);
        };
        if existing.identifier == candidate.identifier {
            return Ok(StageDecision::Pass);
        }
        if existing.doi.is_some() || candidate.doi.is_some() {
            return Ok(StageDecision::fail(
                ValidationError::DuplicatedTitle {
                    title: candidate.title.clone(),
                    identifier: candidate.identifier.clone(),
                    existing_identifier: existing.identifier,
                },
                true,
            ));
        }
        Ok(StageDecision::Pass)
    }
}
