//! `folio-core`: record primitives shared by every portfolio crate.
//!
//! This crate contains **pure** building blocks (no storage, no HTTP).

pub mod error;
pub mod id;
pub mod record;

pub use error::{DomainError, DomainResult};
pub use id::{AccountId, RecordId};
pub use record::{Record, RecordMeta};
