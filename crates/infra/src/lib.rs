//! Infrastructure layer: storage, caching, configuration, outbound calls.

pub mod cache;
pub mod config;
pub mod revalidation;
pub mod store;

pub use cache::TtlCache;
pub use config::{AppConfig, ConfigError};
pub use revalidation::{RevalidationError, RevalidationTarget, RevalidationWorker, Revalidator};
pub use store::{AccountRepository, Database, Repositories, Repository, StoreError, StoreResult, Stored};
