use mintline_ledger::LedgerError;
use mintline_types::{DoiRecord, ProductKind, ValidationError};

use crate::stage::{GateContext, GateStage, StageDecision};

/// Title/kind-consistency check.
///
/// The product kind token ("bundle", "collection", ...) is expected to
/// appear in the title, case-insensitively. `other` carries no canonical
/// token and is exempt, as is the whole check when the gate is configured
/// with `require_kind_in_title = false`.
pub struct TitleKindStage;

impl GateStage for TitleKindStage {
    fn name(&self) -> &str {
        "title-kind"
    }

    fn evaluate(
        &self,
        candidate: &DoiRecord,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, LedgerError> {
        if !context.config.require_kind_in_title || candidate.product_kind == ProductKind::Other {
            return Ok(StageDecision::Pass);
        }

        let token = candidate.product_kind.token();
        if candidate.title.to_ascii_lowercase().contains(token) {
            Ok(StageDecision::Pass)
        } else {
            Ok(StageDecision::fail(
                ValidationError::TitleMismatch {
                    title: candidate.title.clone(),
                    identifier: candidate.identifier.clone(),
                    kind: token.to_string(),
                },
                true,
            ))
        }
    }
}
