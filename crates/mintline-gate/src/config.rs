use serde::{Deserialize, Serialize};

/// Configuration for the workflow gate pipeline.
///
/// Passed explicitly into [`crate::WorkflowGate`]'s constructor; there is
/// no process-wide configuration state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GateConfig {
    /// Whether the title-kind stage enforces that the product kind token
    /// appears in the title. Nodes that title products freely can turn
    /// this off instead of forcing every transaction.
    pub require_kind_in_title: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            require_kind_in_title: true,
        }
    }
}
