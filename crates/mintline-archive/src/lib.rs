//! Raw transaction payload archival for mintline.
//!
//! Every recorded transaction stores its raw input and output payloads
//! out-of-band, under a key derived from the owning node and the
//! transaction's UTC timestamp. The ledger row's `transaction_key` is a
//! pointer into this archive, not the payload itself.
//!
//! # Design Rules
//!
//! 1. Payloads are immutable once written.
//! 2. A key is only ever observable with both payloads fully written —
//!    the filesystem backend stages into a temp directory and renames.
//! 3. Key collisions (same node, same second) disambiguate with a numeric
//!    suffix rather than overwriting.
//! 4. All I/O errors are propagated, never silently ignored.
//!
//! # Backends
//!
//! - [`FsArchive`] — one directory per key holding `input` and `output`
//! - [`InMemoryArchive`] — for tests and embedding

pub mod error;
pub mod fs;
pub mod key;
pub mod memory;
pub mod traits;

pub use error::{ArchiveError, ArchiveResult};
pub use fs::FsArchive;
pub use key::ArchiveKey;
pub use memory::InMemoryArchive;
pub use traits::{TransactionArchive, TransactionPayloads};
