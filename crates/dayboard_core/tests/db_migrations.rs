use dayboard_core::db::migrations::latest_version;
use dayboard_core::db::{open_db, open_db_in_memory, DbError};
use dayboard_core::{RepoError, SqliteStateRepository, StateRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "app_state");
}

#[test]
fn opening_same_database_twice_keeps_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dayboard.db");

    let conn_first = open_db(&path).unwrap();
    SqliteStateRepository::try_new(&conn_first)
        .unwrap()
        .put_value("k", "v1")
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let repo = SqliteStateRepository::try_new(&conn_second).unwrap();
    assert_eq!(repo.get_value("k").unwrap().as_deref(), Some("v1"));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn state_repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteStateRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

#[test]
fn put_value_upserts_and_delete_reports_presence() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();

    assert_eq!(repo.get_value("missing").unwrap(), None);
    repo.put_value("key", "first").unwrap();
    repo.put_value("key", "second").unwrap();
    assert_eq!(repo.get_value("key").unwrap().as_deref(), Some("second"));

    assert!(repo.delete_value("key").unwrap());
    assert!(!repo.delete_value("key").unwrap());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
