//! Foundation types for mintline.
//!
//! This crate provides the core record, identifier, and status types used
//! throughout the mintline system. Every other mintline crate depends on
//! `mintline-types`.
//!
//! # Key Types
//!
//! - [`DoiRecord`] — The persisted transaction row for one identifier state
//! - [`LifecycleStatus`] — Workflow states with a fixed rank ordering
//! - [`ProductId`] — Structured, versionable product identifier
//! - [`ProductKind`] — Closed product classification
//! - [`ValidationError`] / [`ValidationKind`] — The tagged business-rule
//!   error taxonomy callers switch on

pub mod error;
pub mod ident;
pub mod product;
pub mod record;
pub mod status;

pub use error::{IdentError, TokenError, ValidationError, ValidationKind};
pub use ident::{wild_match, ProductId, Vid, MAX_IDENTIFIER_LENGTH};
pub use product::ProductKind;
pub use record::DoiRecord;
pub use status::LifecycleStatus;
