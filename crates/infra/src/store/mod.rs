//! Relational storage for portfolio records.
//!
//! Handlers only see the [`Repository`] seam; [`sqlite`] is the production
//! adapter. Every operation is a single independent statement.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use folio_content::{Contribution, Education, MusicWork, Resource, Skill, User, Website};
use folio_core::{AccountId, Record, RecordId};

pub mod rows;
pub mod schema;
pub mod sqlite;

pub use sqlite::{Database, SqliteRepository};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No live row matched the lookup.
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("{0} does not support deletion")]
    Unsupported(&'static str),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Conflict(db.message().to_string()),
            _ => Self::Database(err),
        }
    }
}

/// CRUD over one record type. Soft-deleted rows are invisible to every call.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// All live rows, optionally restricted to one owner.
    async fn find_all(&self, owner: Option<AccountId>) -> StoreResult<Vec<T>>;

    async fn find_by_id(&self, id: RecordId) -> StoreResult<T>;

    /// Persist a new row; returns it with its generated id and timestamps.
    async fn insert(&self, record: T) -> StoreResult<T>;

    /// Rewrite every column of an existing row by primary key.
    async fn save(&self, record: T) -> StoreResult<T>;

    /// Soft-delete by primary key; returns the number of rows affected.
    async fn delete(&self, id: RecordId) -> StoreResult<u64>;
}

/// Account lookups needed by login and startup checks.
#[async_trait]
pub trait AccountRepository: Repository<User> {
    async fn find_by_email(&self, email: &str) -> StoreResult<User>;

    async fn exists(&self, id: AccountId) -> StoreResult<bool>;
}

/// One repository per record type, built once at startup.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn AccountRepository>,
    pub websites: Arc<dyn Repository<Website>>,
    pub music: Arc<dyn Repository<MusicWork>>,
    pub contributions: Arc<dyn Repository<Contribution>>,
    pub skills: Arc<dyn Repository<Skill>>,
    pub education: Arc<dyn Repository<Education>>,
}

impl Repositories {
    pub fn sqlite(db: &Database) -> Self {
        Self {
            users: Arc::new(SqliteRepository::<User>::new(db)),
            websites: Arc::new(SqliteRepository::<Website>::new(db)),
            music: Arc::new(SqliteRepository::<MusicWork>::new(db)),
            contributions: Arc::new(SqliteRepository::<Contribution>::new(db)),
            skills: Arc::new(SqliteRepository::<Skill>::new(db)),
            education: Arc::new(SqliteRepository::<Education>::new(db)),
        }
    }

    /// The repository for resource type `T`.
    pub fn of<T: Stored>(&self) -> &Arc<dyn Repository<T>> {
        T::repository(self)
    }
}

/// Binds a resource type to its slot in [`Repositories`].
pub trait Stored: Resource {
    fn repository(repos: &Repositories) -> &Arc<dyn Repository<Self>>;
}

macro_rules! impl_stored {
    ($t:ty, $field:ident) => {
        impl Stored for $t {
            fn repository(repos: &Repositories) -> &Arc<dyn Repository<Self>> {
                &repos.$field
            }
        }
    };
}

impl_stored!(Website, websites);
impl_stored!(MusicWork, music);
impl_stored!(Contribution, contributions);
impl_stored!(Skill, skills);
impl_stored!(Education, education);
