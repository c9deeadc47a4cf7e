use mintline_ledger::LedgerError;
use mintline_types::{DoiRecord, ProductId, ValidationError};

use crate::stage::{GateContext, GateStage, StageDecision};

/// Identifier syntax check.
///
/// Never bypassable: a malformed identifier cannot be safely stored or
/// queried later, so not even `force` lets one through.
pub struct SyntaxStage;

impl GateStage for SyntaxStage {
    fn name(&self) -> &str {
        "syntax"
    }

    fn evaluate(
        &self,
        candidate: &DoiRecord,
        _context: &GateContext<'_>,
    ) -> Result<StageDecision, LedgerError> {
        match ProductId::parse(&candidate.identifier) {
            Ok(_) => Ok(StageDecision::Pass),
            Err(e) => Ok(StageDecision::fail(
                ValidationError::InvalidIdentifier(e),
                false,
            )),
        }
    }
}
