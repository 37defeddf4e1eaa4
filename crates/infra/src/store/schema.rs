//! Additive schema bootstrap.
//!
//! Tables and columns are created when absent. Nothing is ever dropped or
//! altered destructively, so an older database file keeps working.

use sqlx::{Row, SqlitePool};

use folio_content::{Contribution, Education, MusicWork, Skill, User, Website};

use super::rows::{Column, SqlRecord};
use super::{Database, StoreResult};

const BASE_COLUMNS: [Column; 3] = [
    Column { name: "created_at", sql_type: "DATETIME" },
    Column { name: "updated_at", sql_type: "DATETIME" },
    Column { name: "deleted_at", sql_type: "DATETIME" },
];

/// Ensure every record table, column and index exists.
pub async fn bootstrap(db: &Database) -> StoreResult<()> {
    let pool = db.pool();
    ensure_table::<User>(pool).await?;
    ensure_table::<Website>(pool).await?;
    ensure_table::<MusicWork>(pool).await?;
    ensure_table::<Contribution>(pool).await?;
    ensure_table::<Skill>(pool).await?;
    ensure_table::<Education>(pool).await?;

    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users (email)")
        .execute(pool)
        .await?;
    Ok(())
}

async fn ensure_table<T: SqlRecord>(pool: &SqlitePool) -> StoreResult<()> {
    let columns = BASE_COLUMNS.iter().chain(T::COLUMNS.iter());

    let definitions = columns
        .clone()
        .map(|c| format!("{} {}", c.name, c.sql_type))
        .collect::<Vec<_>>()
        .join(", ");
    let create = format!(
        "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT, {definitions})",
        T::TABLE
    );
    sqlx::query(&create).execute(pool).await?;

    let existing = existing_columns(pool, T::TABLE).await?;
    for column in columns.filter(|c| !existing.iter().any(|name| name == c.name)) {
        tracing::info!(table = T::TABLE, column = column.name, "adding missing column");
        let alter = format!("ALTER TABLE {} ADD COLUMN {} {}", T::TABLE, column.name, column.sql_type);
        sqlx::query(&alter).execute(pool).await?;
    }

    let index = format!(
        "CREATE INDEX IF NOT EXISTS idx_{table}_deleted_at ON {table} (deleted_at)",
        table = T::TABLE
    );
    sqlx::query(&index).execute(pool).await?;
    Ok(())
}

async fn existing_columns(pool: &SqlitePool, table: &str) -> StoreResult<Vec<String>> {
    let rows = sqlx::query(&format!("PRAGMA table_info({table})")).fetch_all(pool).await?;
    rows.iter()
        .map(|row| row.try_get::<String, _>("name").map_err(Into::into))
        .collect()
}
