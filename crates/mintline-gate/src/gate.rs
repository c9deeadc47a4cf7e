use mintline_ledger::{LedgerStore, StateResolver};
use mintline_types::DoiRecord;
use tracing::{debug, warn};

use crate::config::GateConfig;
use crate::error::GateError;
use crate::stage::{GateContext, GateStage, StageDecision, StageResult};
use crate::stages::{
    DuplicateTitleStage, RebindStage, SyntaxStage, TitleKindStage, WorkflowOrderStage,
};

/// The audit trail of one accepted evaluation: per-stage results in
/// pipeline order, bypassed failures included.
#[derive(Clone, Debug)]
pub struct GateReport {
    pub stage_results: Vec<StageResult>,
}

impl GateReport {
    /// `true` when every stage passed on its own merits (nothing was
    /// force-bypassed).
    pub fn is_clean(&self) -> bool {
        self.stage_results.iter().all(|r| r.passed)
    }

    /// The stages whose failures were bypassed by `force`.
    pub fn bypassed(&self) -> Vec<&StageResult> {
        self.stage_results.iter().filter(|r| r.bypassed).collect()
    }
}

/// The workflow gate: the fixed pipeline of invariant checks every
/// candidate must pass before a new transaction is accepted.
///
/// The pipeline is **fail-fast**: the first stage that fails (and is not
/// bypassed) stops evaluation and surfaces its error. Bypass requires the
/// caller's explicit `force` flag, a check that declares itself
/// bypassable, and an error kind that is not categorically exempt.
pub struct WorkflowGate {
    stages: Vec<Box<dyn GateStage>>,
    config: GateConfig,
}

impl WorkflowGate {
    /// Create a gate with an empty pipeline. Use [`Self::add_stage`], or
    /// [`Self::with_default_stages`] for the standard pipeline.
    pub fn new(config: GateConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Create a gate with the fixed standard pipeline:
    /// duplicate-title → title-kind → rebind → workflow-order → syntax.
    pub fn with_default_stages(config: GateConfig) -> Self {
        let mut gate = Self::new(config);
        gate.add_stage(Box::new(DuplicateTitleStage));
        gate.add_stage(Box::new(TitleKindStage));
        gate.add_stage(Box::new(RebindStage));
        gate.add_stage(Box::new(WorkflowOrderStage));
        gate.add_stage(Box::new(SyntaxStage));
        gate
    }

    /// Append a stage to the end of the pipeline.
    pub fn add_stage(&mut self, stage: Box<dyn GateStage>) {
        self.stages.push(stage);
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Evaluate a candidate against the ledger's current state.
    ///
    /// Returns the audit trail on acceptance, the first non-bypassed
    /// validation failure otherwise. Storage failures abort evaluation and
    /// are never bypassed by `force`.
    pub fn evaluate(
        &self,
        candidate: &DoiRecord,
        store: &dyn LedgerStore,
        force: bool,
    ) -> Result<GateReport, GateError> {
        let context = GateContext {
            resolver: StateResolver::new(store),
            config: &self.config,
            force,
        };

        let mut stage_results = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let decision = stage.evaluate(candidate, &context)?;
            match decision {
                StageDecision::Pass => {
                    stage_results.push(StageResult {
                        stage_name: stage.name().to_string(),
                        passed: true,
                        bypassed: false,
                        reason: None,
                    });
                }
                StageDecision::Fail { error, forceable } => {
                    if force && forceable && error.kind().force_eligible() {
                        warn!(
                            stage = stage.name(),
                            identifier = %candidate.identifier,
                            %error,
                            "validation failure bypassed by force"
                        );
                        stage_results.push(StageResult {
                            stage_name: stage.name().to_string(),
                            passed: false,
                            bypassed: true,
                            reason: Some(error.to_string()),
                        });
                    } else {
                        debug!(
                            stage = stage.name(),
                            identifier = %candidate.identifier,
                            %error,
                            "validation failure"
                        );
                        return Err(GateError::Validation(error));
                    }
                }
            }
        }

        Ok(GateReport { stage_results })
    }
}
