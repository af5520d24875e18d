use deadlines_core::db::migrations::latest_version;
use deadlines_core::db::{open_db, open_db_in_memory, DbError};
use deadlines_core::{KeyValueStore, SqliteKeyValueStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_store');",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn reopening_file_keeps_schema_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deadlines.sqlite3");

    let kv = SqliteKeyValueStore::new(open_db(&path).unwrap());
    kv.put("SavedDeadlines", b"[]").unwrap();
    drop(kv);

    let kv = SqliteKeyValueStore::new(open_db(&path).unwrap());
    assert_eq!(schema_version(kv.connection()), latest_version());
    assert_eq!(kv.get("SavedDeadlines").unwrap(), Some(b"[]".to_vec()));
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 42);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn put_upserts_and_delete_reports_presence() {
    let kv = SqliteKeyValueStore::new(open_db_in_memory().unwrap());

    assert_eq!(kv.get("k").unwrap(), None);
    kv.put("k", b"one").unwrap();
    kv.put("k", b"two").unwrap();
    assert_eq!(kv.get("k").unwrap(), Some(b"two".to_vec()));

    assert!(kv.delete("k").unwrap());
    assert!(!kv.delete("k").unwrap());
    assert_eq!(kv.get("k").unwrap(), None);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
