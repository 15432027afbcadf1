//! SQLite storage for the routine and todo collections.
//!
//! # Responsibility
//! - Open connections with migrations applied.
//! - Tell repositories whether a connection is ready for use.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - Repositories refuse connections that are not at `latest_version()` or
//!   lack the table they read.

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failures.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// The connection has not been migrated to this build's schema.
    NotMigrated { expected: u32, found: u32 },
    /// A migrated connection lacks a table the caller needs.
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "store schema v{found} was written by a newer build (this build reads up to v{supported})"
            ),
            Self::NotMigrated { expected, found } => {
                write!(f, "store schema is v{found}, expected v{expected}")
            }
            Self::MissingTable(table) => write!(f, "store has no `{table}` table"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Checks that `conn` is migrated to the latest schema and holds `table`.
pub fn ensure_ready(conn: &Connection, table: &'static str) -> DbResult<()> {
    let expected = migrations::latest_version();
    let found = migrations::user_version(conn)?;
    if found != expected {
        return Err(DbError::NotMigrated { expected, found });
    }

    let present: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [table],
        |row| row.get(0),
    )?;
    if !present {
        return Err(DbError::MissingTable(table));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_ready, open_db_in_memory, DbError};
    use rusqlite::Connection;

    #[test]
    fn migrated_connection_is_ready_for_kv_table() {
        let conn = open_db_in_memory().expect("open");
        ensure_ready(&conn, "kv_entries").expect("ready");
        assert!(matches!(
            ensure_ready(&conn, "nope"),
            Err(DbError::MissingTable("nope"))
        ));
    }

    #[test]
    fn raw_connection_is_not_migrated() {
        let conn = Connection::open_in_memory().expect("raw");
        assert!(matches!(
            ensure_ready(&conn, "kv_entries"),
            Err(DbError::NotMigrated { found: 0, .. })
        ));
    }
}
