//! Append-only transaction ledger for mintline.
//!
//! This crate is the durable heart of the system. It provides:
//! - The [`LedgerStore`] trait boundary (append + criteria query)
//! - [`InMemoryLedger`] for tests and embedding
//! - [`FileLedger`], a crash-recoverable file backend with CRC-framed rows
//!   and an advisory lock serializing multi-process appends
//! - [`Criteria`], the multi-field, wildcard-capable query contract
//! - [`StateResolver`], the latest-state query layer the workflow gate
//!   depends on
//!
//! Rows are never mutated after insertion. The single mutable fact — which
//! row is an identifier's current state — is maintained inside the same
//! atomic unit as the insert, so a reader can never observe two (or zero)
//! latest rows for an identifier that has any.

pub mod error;
pub mod file;
mod latest;
pub mod memory;
pub mod query;
pub mod resolver;
pub mod traits;

pub use error::{LedgerError, LedgerResult};
pub use file::{FileLedger, FileLedgerConfig};
pub use memory::InMemoryLedger;
pub use query::{Criteria, TimeRange};
pub use resolver::StateResolver;
pub use traits::{Appended, LedgerStore};
