//! Document Store
//!
//! Connection handling for the SQLite database that backs every collection,
//! plus the small helpers the per-collection modules share when mapping rows
//! to documents.
//!
//! Each collection is one table. Scalar fields are columns, embedded arrays
//! and sub-documents are JSON text columns, and references are UUID strings.
//! Membership in a reference array is queried with `json_each`, e.g.
//!
//! ```sql
//! SELECT * FROM cookbooks
//! WHERE owner_id = ?1
//!    OR EXISTS (SELECT 1 FROM json_each(cookbooks.invited_users) WHERE value = ?1)
//! ```

use std::str::FromStr;
use std::time::Duration;

use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Open a pool for `database_url`, creating the database file if needed.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(8)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
}

/// Open a private in-memory database.
///
/// Every connection to `sqlite::memory:` gets its own database, so the pool
/// is pinned to one connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Apply the migrations in `migrations/`
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

fn decode_error(column: &str, err: impl std::fmt::Display) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: err.to_string().into(),
    }
}

/// Read a UUID stored as text
pub fn uuid_column(row: &SqliteRow, column: &str) -> Result<Uuid, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Uuid::parse_str(&raw).map_err(|e| decode_error(column, e))
}

/// Read a nullable UUID stored as text
pub fn opt_uuid_column(row: &SqliteRow, column: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.filter(|s| !s.is_empty())
        .map(|s| Uuid::parse_str(&s).map_err(|e| decode_error(column, e)))
        .transpose()
}

/// Read a JSON text column
pub fn json_column<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(|e| decode_error(column, e))
}

/// Read a nullable JSON text column
pub fn opt_json_column<T: DeserializeOwned>(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<T>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|s| serde_json::from_str(&s).map_err(|e| decode_error(column, e)))
        .transpose()
}

/// Optional text column that defaults to empty
pub fn text_column(row: &SqliteRow, column: &str) -> Result<String, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    Ok(raw.unwrap_or_default())
}

/// `%term%` pattern for `LIKE ... ESCAPE '\'`, lower-cased, with wildcards escaped
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
