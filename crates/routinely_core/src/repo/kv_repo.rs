//! Key-value repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide whole-value get/set/remove over string keys.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Values are stored and returned verbatim; no partial updates.
//! - A repository is only constructed over a fully migrated connection.

use crate::db::{ensure_ready, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

const KV_TABLE: &str = "kv_entries";

/// Result type used by key-value repository operations.
pub type KvRepoResult<T> = Result<T, KvRepoError>;

/// Errors from key-value repository operations.
#[derive(Debug)]
pub enum KvRepoError {
    /// Connection not ready, or a SQLite call failed.
    Db(DbError),
}

impl Display for KvRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "key-value store: {err}"),
        }
    }
}

impl Error for KvRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for KvRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for whole-value key-value storage.
pub trait KvRepository {
    /// Loads the value stored under `key`.
    fn get_value(&self, key: &str) -> KvRepoResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set_value(&self, key: &str, value: &str) -> KvRepoResult<()>;
    /// Removes `key`. Returns whether a value existed.
    fn remove_value(&self, key: &str) -> KvRepoResult<bool>;
}

/// SQLite-backed key-value repository.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> KvRepoResult<Self> {
        ensure_ready(conn, KV_TABLE)?;
        Ok(Self { conn })
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn get_value(&self, key: &str) -> KvRepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value
                 FROM kv_entries
                 WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_value(&self, key: &str, value: &str) -> KvRepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value,
                 updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_value(&self, key: &str) -> KvRepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}
