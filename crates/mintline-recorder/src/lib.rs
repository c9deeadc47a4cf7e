//! Transaction recorder for mintline.
//!
//! [`TransactionRecorder`] is the only construction path for ledger rows.
//! One call to [`TransactionRecorder::record`] normalizes and stamps the
//! candidate, short-circuits if it is content-identical to the current
//! latest row (idempotence), runs the workflow gate against current ledger
//! state, archives the raw payload pair, and only then appends — so a
//! crash can never produce a ledger row pointing at missing archival
//! content.

pub mod error;
pub mod recorder;

pub use error::RecordError;
pub use recorder::TransactionRecorder;
