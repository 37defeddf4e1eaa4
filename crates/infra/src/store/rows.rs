//! Row mapping between record types and their SQLite tables.

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};

use folio_content::{Contribution, Education, MusicWork, Resource, Skill, User, Website};
use folio_core::{AccountId, Record, RecordId, RecordMeta};

pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Column of a record table beyond the shared base columns.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
}

/// A record type with a table behind it.
pub trait SqlRecord: Record + Unpin {
    const TABLE: &'static str;

    /// Content columns, in bind order.
    const COLUMNS: &'static [Column];

    /// Column holding the owner id, if the table is owner-scoped.
    const OWNER_COLUMN: Option<&'static str>;

    const DELETABLE: bool;

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;

    /// Bind content columns in [`SqlRecord::COLUMNS`] order.
    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;
}

pub(crate) fn meta_from_row(row: &SqliteRow) -> Result<RecordMeta, sqlx::Error> {
    let created_at: Option<DateTime<Utc>> = row.try_get("created_at")?;
    let updated_at: Option<DateTime<Utc>> = row.try_get("updated_at")?;
    Ok(RecordMeta {
        id: RecordId::new(row.try_get::<i64, _>("id")?),
        created_at: created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        updated_at: updated_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        deleted_at: row.try_get("deleted_at")?,
    })
}

// Columns added by an additive migration are NULL on old rows.
fn text(row: &SqliteRow, column: &str) -> Result<String, sqlx::Error> {
    Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
}

fn owner(row: &SqliteRow, column: &str) -> Result<AccountId, sqlx::Error> {
    Ok(AccountId::new(row.try_get::<Option<i64>, _>(column)?.unwrap_or_default()))
}

macro_rules! sql_type {
    (text) => {
        "TEXT"
    };
    (owner) => {
        "INTEGER"
    };
}

macro_rules! read_column {
    (text, $row:expr, $col:literal) => {
        text($row, $col)?
    };
    (owner, $row:expr, $col:literal) => {
        owner($row, $col)?
    };
}

macro_rules! bind_column {
    (text, $query:expr, $value:expr) => {
        $query.bind($value.as_str())
    };
    (owner, $query:expr, $value:expr) => {
        $query.bind($value.get())
    };
}

macro_rules! sql_record {
    (
        $t:ty,
        table: $table:literal,
        owner_column: $owner:expr,
        deletable: $deletable:expr,
        columns { $($field:ident => $col:literal : $kind:ident),* $(,)? }
    ) => {
        impl SqlRecord for $t {
            const TABLE: &'static str = $table;
            const COLUMNS: &'static [Column] = &[$(Column { name: $col, sql_type: sql_type!($kind) }),*];
            const OWNER_COLUMN: Option<&'static str> = $owner;
            const DELETABLE: bool = $deletable;

            fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
                Ok(Self {
                    meta: meta_from_row(row)?,
                    $($field: read_column!($kind, row, $col),)*
                })
            }

            fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
                $(let query = bind_column!($kind, query, self.$field);)*
                query
            }
        }
    };
}

sql_record!(User, table: "users", owner_column: None, deletable: false, columns {
    name => "name": text,
    email => "email": text,
    password_hash => "password": text,
});

sql_record!(Website, table: "websites", owner_column: Some("user_id"), deletable: Website::KIND.supports_delete(), columns {
    user_id => "user_id": owner,
    title => "title": text,
    description => "description": text,
    url => "url": text,
    content => "content": text,
});

sql_record!(MusicWork, table: "music_works", owner_column: Some("user_id"), deletable: MusicWork::KIND.supports_delete(), columns {
    user_id => "user_id": owner,
    title => "title": text,
    description => "description": text,
    url => "url": text,
    content => "content": text,
});

sql_record!(Contribution, table: "contributions", owner_column: Some("user_id"), deletable: Contribution::KIND.supports_delete(), columns {
    user_id => "user_id": owner,
    title => "title": text,
    description => "description": text,
    url => "url": text,
    content => "content": text,
});

sql_record!(Skill, table: "skills", owner_column: Some("user_id"), deletable: Skill::KIND.supports_delete(), columns {
    user_id => "user_id": owner,
    name => "name": text,
    description => "description": text,
});

sql_record!(Education, table: "educations", owner_column: Some("user_id"), deletable: Education::KIND.supports_delete(), columns {
    user_id => "user_id": owner,
    institution => "institution": text,
    degree => "degree": text,
    field_of_study => "field_of_study": text,
    start_date => "start_date": text,
    end_date => "end_date": text,
    description => "description": text,
});
