//! Workflow gate for mintline.
//!
//! Every candidate row must pass through the gate before it can be
//! recorded in the ledger. The gate runs a fixed pipeline of check stages
//! against the identifier's current ledger state and produces the first
//! failure, or an audit trail of passed (and force-bypassed) stages.
//!
//! Stage order is part of the contract:
//! duplicate-title → title-kind → rebind → workflow-order → syntax.
//!
//! # Quick Start
//!
//! ```
//! use mintline_gate::{GateConfig, WorkflowGate};
//! use mintline_ledger::InMemoryLedger;
//! # use chrono::Utc;
//! # use mintline_types::{DoiRecord, LifecycleStatus, ProductKind};
//!
//! let ledger = InMemoryLedger::new();
//! let gate = WorkflowGate::with_default_stages(GateConfig::default());
//! # let candidate = DoiRecord {
//! #     identifier: "urn:nasa:pds:insight_cameras::1.0".into(),
//! #     status: LifecycleStatus::Reserved,
//! #     date_added: Utc::now(),
//! #     date_updated: Utc::now(),
//! #     submitter: "submitter@example.org".into(),
//! #     title: "InSight Cameras Bundle".into(),
//! #     product_kind: ProductKind::Bundle,
//! #     product_subkind: String::new(),
//! #     node_id: "img".into(),
//! #     doi: None,
//! #     transaction_key: String::new(),
//! #     is_latest: true,
//! # };
//! let report = gate.evaluate(&candidate, &ledger, false).unwrap();
//! assert!(report.is_clean());
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod stage;
pub mod stages;

pub use config::GateConfig;
pub use error::GateError;
pub use gate::{GateReport, WorkflowGate};
pub use stage::{GateContext, GateStage, StageDecision, StageResult};
