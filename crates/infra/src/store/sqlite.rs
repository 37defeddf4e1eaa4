//! SQLite adapter for [`Repository`].

use std::marker::PhantomData;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use folio_content::User;
use folio_core::{AccountId, RecordId};

use super::rows::SqlRecord;
use super::{AccountRepository, Repository, StoreError, StoreResult};

/// Shared SQLite connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `url`.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let path = options.get_filename();
        if path.as_os_str() != ":memory:" {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Database(sqlx::Error::Io(e)))?;
            }
        }

        let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;
        Ok(Self { pool })
    }

    /// A private in-memory database (single connection, never recycled).
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Repository over the table of record type `T`.
pub struct SqliteRepository<T> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> T>,
}

impl<T> SqliteRepository<T> {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool.clone(),
            _record: PhantomData,
        }
    }
}

fn column_list<T: SqlRecord>() -> String {
    T::COLUMNS.iter().map(|c| c.name).collect::<Vec<_>>().join(", ")
}

#[async_trait]
impl<T: SqlRecord> Repository<T> for SqliteRepository<T> {
    async fn find_all(&self, owner: Option<AccountId>) -> StoreResult<Vec<T>> {
        let rows = match (owner, T::OWNER_COLUMN) {
            (Some(owner), Some(column)) => {
                let sql = format!(
                    "SELECT * FROM {} WHERE deleted_at IS NULL AND {column} = ? ORDER BY id",
                    T::TABLE
                );
                sqlx::query(&sql).bind(owner.get()).fetch_all(&self.pool).await?
            }
            _ => {
                let sql = format!("SELECT * FROM {} WHERE deleted_at IS NULL ORDER BY id", T::TABLE);
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };

        rows.iter().map(|row| T::from_row(row).map_err(StoreError::from)).collect()
    }

    async fn find_by_id(&self, id: RecordId) -> StoreResult<T> {
        let sql = format!("SELECT * FROM {} WHERE id = ? AND deleted_at IS NULL LIMIT 1", T::TABLE);
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(T::from_row(&row)?)
    }

    async fn insert(&self, mut record: T) -> StoreResult<T> {
        let now = Utc::now();
        let placeholders = vec!["?"; T::COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} (created_at, updated_at, deleted_at, {}) VALUES (?, ?, NULL, {placeholders})",
            T::TABLE,
            column_list::<T>(),
        );

        let result = record
            .bind_columns(sqlx::query(&sql).bind(now).bind(now))
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_write)?;

        let meta = record.meta_mut();
        meta.id = RecordId::new(result.last_insert_rowid());
        meta.created_at = now;
        meta.updated_at = now;
        meta.deleted_at = None;
        Ok(record)
    }

    async fn save(&self, mut record: T) -> StoreResult<T> {
        let now = Utc::now();
        let assignments = T::COLUMNS
            .iter()
            .map(|c| format!("{} = ?", c.name))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET updated_at = ?, {assignments} WHERE id = ? AND deleted_at IS NULL",
            T::TABLE
        );

        let id = record.meta().id;
        let result = record
            .bind_columns(sqlx::query(&sql).bind(now))
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_write)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        record.meta_mut().updated_at = now;
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> StoreResult<u64> {
        if !T::DELETABLE {
            return Err(StoreError::Unsupported(T::TABLE));
        }
        let sql = format!("UPDATE {} SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL", T::TABLE);
        let result = sqlx::query(&sql)
            .bind(Utc::now())
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AccountRepository for SqliteRepository<User> {
    async fn find_by_email(&self, email: &str) -> StoreResult<User> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ? AND deleted_at IS NULL LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(<User as SqlRecord>::from_row(&row)?)
    }

    async fn exists(&self, id: AccountId) -> StoreResult<bool> {
        let row = sqlx::query("SELECT 1 FROM users WHERE id = ? AND deleted_at IS NULL")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema;
    use folio_content::{Skill, Website};

    async fn database() -> Database {
        let db = Database::in_memory().await.unwrap();
        schema::bootstrap(&db).await.unwrap();
        db
    }

    fn website(owner: i64, title: &str) -> Website {
        Website {
            user_id: AccountId::new(owner),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let db = database().await;
        let repo = SqliteRepository::<Website>::new(&db);

        let stored = repo.insert(website(1, "Folio")).await.unwrap();
        assert!(!stored.meta.id.is_unset());
        assert_eq!(stored.meta.created_at, stored.meta.updated_at);

        let loaded = repo.find_by_id(stored.meta.id).await.unwrap();
        assert_eq!(loaded.title, "Folio");
        assert_eq!(loaded.user_id, AccountId::new(1));
        assert_eq!(loaded.meta.id, stored.meta.id);
    }

    #[tokio::test]
    async fn find_all_filters_by_owner() {
        let db = database().await;
        let repo = SqliteRepository::<Website>::new(&db);
        repo.insert(website(1, "mine")).await.unwrap();
        repo.insert(website(2, "theirs")).await.unwrap();

        let mine = repo.find_all(Some(AccountId::new(1))).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "mine");
        assert_eq!(repo.find_all(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let db = database().await;
        let repo = SqliteRepository::<Website>::new(&db);

        assert!(matches!(repo.find_by_id(RecordId::new(99)).await, Err(StoreError::NotFound)));
        let mut ghost = website(1, "ghost");
        ghost.meta.id = RecordId::new(99);
        assert!(matches!(repo.save(ghost).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn save_rewrites_columns() {
        let db = database().await;
        let repo = SqliteRepository::<Website>::new(&db);
        let mut stored = repo.insert(website(1, "before")).await.unwrap();

        stored.title = "after".to_string();
        stored.url = "https://after.example".to_string();
        repo.save(stored.clone()).await.unwrap();

        let loaded = repo.find_by_id(stored.meta.id).await.unwrap();
        assert_eq!(loaded.title, "after");
        assert_eq!(loaded.url, "https://after.example");
        assert_eq!(loaded.meta.created_at, stored.meta.created_at);
    }

    #[tokio::test]
    async fn skill_delete_is_soft_and_counts_live_rows() {
        let db = database().await;
        let repo = SqliteRepository::<Skill>::new(&db);
        let skill = repo
            .insert(Skill { name: "Rust".to_string(), user_id: AccountId::new(1), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(repo.delete(skill.meta.id).await.unwrap(), 1);
        assert_eq!(repo.delete(skill.meta.id).await.unwrap(), 0);
        assert_eq!(repo.delete(RecordId::new(999)).await.unwrap(), 0);
        assert!(matches!(repo.find_by_id(skill.meta.id).await, Err(StoreError::NotFound)));
        assert!(repo.find_all(None).await.unwrap().is_empty());

        let row_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM skills")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row_count, 1);
    }

    #[tokio::test]
    async fn other_kinds_refuse_delete() {
        let db = database().await;
        let repo = SqliteRepository::<Website>::new(&db);
        assert!(matches!(repo.delete(RecordId::new(1)).await, Err(StoreError::Unsupported("websites"))));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let db = database().await;
        let repo = SqliteRepository::<User>::new(&db);
        repo.insert(User::new("A", "a@x.com", "hash")).await.unwrap();

        assert!(matches!(
            repo.insert(User::new("B", "a@x.com", "hash")).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn accounts_by_email_and_id() {
        let db = database().await;
        let repo = SqliteRepository::<User>::new(&db);
        let user = repo.insert(User::new("Andrew", "a@x.com", "hash")).await.unwrap();

        let found = repo.find_by_email("a@x.com").await.unwrap();
        assert_eq!(found.password_hash, "hash");
        assert!(matches!(repo.find_by_email("b@x.com").await, Err(StoreError::NotFound)));
        assert!(repo.exists(AccountId::new(user.meta.id.get())).await.unwrap());
        assert!(!repo.exists(AccountId::new(404)).await.unwrap());
    }
}
