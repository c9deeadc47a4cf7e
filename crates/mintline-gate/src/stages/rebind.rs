use mintline_ledger::LedgerError;
use mintline_types::{DoiRecord, ValidationError};

use crate::stage::{GateContext, GateStage, StageDecision};

/// Identifier/DOI binding check.
///
/// A minted DOI belongs to exactly one identifier for the lifetime of the
/// ledger. Re-associating a DOI that another identifier holds is refused
/// outright — no force bypass, since the registration provider's state
/// would diverge. Correcting the DOI recorded on the candidate's own
/// identifier is also refused, but may be forced.
pub struct RebindStage;

impl GateStage for RebindStage {
    fn name(&self) -> &str {
        "rebind"
    }

    fn evaluate(
        &self,
        candidate: &DoiRecord,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, LedgerError> {
        let Some(doi) = &candidate.doi else {
            return Ok(StageDecision::Pass);
        };

        if let Some(holder) = context.resolver.latest_by_doi(doi)? {
            if holder.identifier != candidate.identifier {
                return Ok(StageDecision::fail(
                    ValidationError::IllegalRebind {
                        doi: doi.clone(),
                        identifier: candidate.identifier.clone(),
                        reason: format!("DOI is already bound to {}", holder.identifier),
                    },
                    false,
                ));
            }
        }

        if let Some(current) = context.resolver.latest_of(&candidate.identifier)? {
            if let Some(existing_doi) = &current.doi {
                if existing_doi != doi {
                    return Ok(StageDecision::fail(
                        ValidationError::IllegalRebind {
                            doi: doi.clone(),
                            identifier: candidate.identifier.clone(),
                            reason: format!("identifier already carries DOI {existing_doi}"),
                        },
                        true,
                    ));
                }
            }
        }

        Ok(StageDecision::Pass)
    }
}
