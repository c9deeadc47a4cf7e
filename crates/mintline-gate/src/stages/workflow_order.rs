use mintline_ledger::LedgerError;
use mintline_types::{DoiRecord, ValidationError};

use crate::stage::{GateContext, GateStage, StageDecision};

/// Workflow-order check.
///
/// Statuses for a fixed identifier must be non-decreasing in workflow
/// rank over time. The rankless side states (`error`, `deactivated`) are
/// reachable from any rank and any rank may follow them.
pub struct WorkflowOrderStage;

impl GateStage for WorkflowOrderStage {
    fn name(&self) -> &str {
        "workflow-order"
    }

    fn evaluate(
        &self,
        candidate: &DoiRecord,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, LedgerError> {
        let Some(current) = context.resolver.latest_of(&candidate.identifier)? else {
            return Ok(StageDecision::Pass);
        };

        if let (Some(current_rank), Some(requested_rank)) =
            (current.status.rank(), candidate.status.rank())
        {
            if current_rank > requested_rank {
                return Ok(StageDecision::fail(
                    ValidationError::WorkflowRegression {
                        identifier: candidate.identifier.clone(),
                        current: current.status,
                        requested: candidate.status,
                    },
                    true,
                ));
            }
        }

        Ok(StageDecision::Pass)
    }
}
