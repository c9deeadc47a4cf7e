use mintline_ledger::{LedgerError, StateResolver};
use mintline_types::{DoiRecord, ValidationError};

use crate::config::GateConfig;

/// The outcome of a single gate stage evaluation.
#[derive(Debug)]
pub enum StageDecision {
    /// The check passed; proceed to the next stage.
    Pass,
    /// The check failed. `forceable` is the check's own declaration of
    /// whether an explicit `force` flag may bypass it; the pipeline still
    /// refuses to bypass kinds that are categorically exempt.
    Fail {
        error: ValidationError,
        forceable: bool,
    },
}

impl StageDecision {
    pub fn fail(error: ValidationError, forceable: bool) -> Self {
        Self::Fail { error, forceable }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Recorded result from a completed stage evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageResult {
    /// Name of the stage that produced this result.
    pub stage_name: String,
    /// Whether the check passed on its own merits.
    pub passed: bool,
    /// Whether a failure was bypassed by the caller's `force` flag.
    pub bypassed: bool,
    /// The failure message, when the check did not pass.
    pub reason: Option<String>,
}

/// Contextual information available to every gate stage.
pub struct GateContext<'a> {
    /// Latest-state lookups against the ledger the candidate targets.
    pub resolver: StateResolver<'a>,
    /// The gate's configuration.
    pub config: &'a GateConfig,
    /// Caller-supplied bypass flag for business-rule failures.
    pub force: bool,
}

/// A single check in the gate pipeline.
///
/// Stages are evaluated in the fixed pipeline order. Each stage receives
/// the candidate row and the shared context, and returns a pass/fail
/// decision; resolver lookups may fail with a storage error, which aborts
/// the pipeline without a decision.
pub trait GateStage: Send + Sync {
    /// Stable stage name used in audit trails (e.g. "rebind").
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        candidate: &DoiRecord,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, LedgerError>;
}
