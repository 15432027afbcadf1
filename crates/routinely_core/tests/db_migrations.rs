use routinely_core::db::migrations::latest_version;
use routinely_core::db::{open_db, open_db_in_memory, DbError};
use routinely_core::repo::planner_repo::TODOS_KEY;
use routinely_core::{KvRepository, SqliteKvRepository};
use rusqlite::Connection;

#[test]
fn in_memory_database_is_fully_migrated() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert!(table_exists(&conn, "kv_entries"));
}

#[test]
fn reopening_file_database_keeps_schema_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routinely.db");

    let first = open_db(&path).unwrap();
    SqliteKvRepository::try_new(&first)
        .unwrap()
        .set_value(TODOS_KEY, "[]")
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    let stored = SqliteKvRepository::try_new(&second)
        .unwrap()
        .get_value(TODOS_KEY)
        .unwrap();
    assert_eq!(stored.as_deref(), Some("[]"));
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 42);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn table_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [name],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}
