use checklist_core::db::migrations::STORE_VERSION;
use checklist_core::db::{open_db, open_db_in_memory, DbError};
use checklist_core::{default_tree, SqliteStateStore, StateStore, SubcategoryId, STATE_KEY};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_stamps_store_version() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(store_version(&conn), STORE_VERSION);
    assert_table_exists(&conn, "selected_state");
}

#[test]
fn reopening_database_keeps_saved_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checklist.db");

    let conn_first = open_db(&path).unwrap();
    let mut tree = default_tree();
    tree.toggle_subcategory(SubcategoryId::new(6)).unwrap();
    SqliteStateStore::try_new(&conn_first)
        .unwrap()
        .put_state(STATE_KEY, &tree)
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(store_version(&conn_second), STORE_VERSION);
    let store = SqliteStateStore::try_new(&conn_second).unwrap();
    assert_eq!(store.get_state(STATE_KEY).unwrap(), Some(tree));
}

#[test]
fn unversioned_state_table_is_adopted_with_its_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let mut tree = default_tree();
    tree.toggle_subcategory(SubcategoryId::new(1)).unwrap();
    let raw = serde_json::to_string(&tree).unwrap();

    let legacy = Connection::open(&path).unwrap();
    legacy
        .execute_batch(
            "CREATE TABLE selected_state (
                id INTEGER PRIMARY KEY NOT NULL,
                state TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT 0
            );",
        )
        .unwrap();
    legacy
        .execute(
            "INSERT INTO selected_state (id, state) VALUES (?1, ?2);",
            rusqlite::params![STATE_KEY, raw],
        )
        .unwrap();
    assert_eq!(store_version(&legacy), 0);
    drop(legacy);

    let conn = open_db(&path).unwrap();
    assert_eq!(store_version(&conn), STORE_VERSION);
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM selected_state;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);

    let store = SqliteStateStore::try_new(&conn).unwrap();
    assert_eq!(store.get_state(STATE_KEY).unwrap(), Some(tree));
}

#[test]
fn opening_database_with_newer_store_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedStoreVersion { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, STORE_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn store_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
