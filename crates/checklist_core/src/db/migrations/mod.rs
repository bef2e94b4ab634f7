//! State store schema bootstrap.
//!
//! # Responsibility
//! - Bring a connection to the single supported store version.
//! - Adopt an unversioned `selected_state` table left by an earlier build.
//!
//! # Invariants
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - Existing snapshot rows survive adoption untouched.
//! - A snapshot shape change needs a new store version; stored JSON is never
//!   upgraded implicitly.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Store version written by this binary.
pub const STORE_VERSION: u32 = 1;

const INIT_SQL: &str = include_str!("0001_init.sql");

/// Creates or adopts the state table and stamps [`STORE_VERSION`].
///
/// Already-current connections are left alone; newer ones are rejected.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    if current_version > STORE_VERSION {
        return Err(DbError::UnsupportedStoreVersion {
            found: current_version,
            supported: STORE_VERSION,
        });
    }
    if current_version == STORE_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(INIT_SQL)?;
    let adopted_rows: i64 =
        tx.query_row("SELECT COUNT(*) FROM selected_state;", [], |row| row.get(0))?;
    tx.execute_batch(&format!("PRAGMA user_version = {STORE_VERSION};"))?;
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} adopted_rows={}",
        current_version, STORE_VERSION, adopted_rows
    );
    Ok(())
}

/// Reads the store version recorded on the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
