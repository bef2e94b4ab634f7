//! Checklist state store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist whole-tree snapshots under a key as one opaque JSON record.
//! - Keep SQL and serialization details inside the persistence boundary.
//!
//! # Invariants
//! - Writes replace the full record; there is no partial update.
//! - Read paths reject snapshots failing `ChecklistTree::validate()`.
//! - Deleting an absent key is not an error.

use crate::db::migrations::STORE_VERSION;
use crate::db::DbError;
use crate::model::checklist::{ChecklistTree, SnapshotValidationError};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key of a stored snapshot record.
pub type StateKey = i64;

/// The single record the checklist reads and writes.
pub const STATE_KEY: StateKey = 1;

const STATE_TABLE: &str = "selected_state";
const STATE_COLUMNS: [&str; 3] = ["id", "state", "updated_at"];

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from state store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Snapshot could not be encoded or decoded as JSON.
    Serialization(serde_json::Error),
    /// Snapshot decoded but violates tree invariants.
    InvalidData(SnapshotValidationError),
    /// Connection is not at the expected store version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from the state table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid snapshot encoding: {err}"),
            Self::InvalidData(err) => write!(f, "invalid persisted snapshot: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "state store requires version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "state store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "state store requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<SnapshotValidationError> for StoreError {
    fn from(value: SnapshotValidationError) -> Self {
        Self::InvalidData(value)
    }
}

/// Key-value persistence for checklist snapshots.
pub trait StateStore {
    /// Loads the snapshot stored under `key`, if any.
    fn get_state(&self, key: StateKey) -> StoreResult<Option<ChecklistTree>>;
    /// Stores `tree` under `key`, replacing any previous snapshot.
    fn put_state(&self, key: StateKey, tree: &ChecklistTree) -> StoreResult<()>;
    /// Removes the snapshot stored under `key`.
    fn delete_state(&self, key: StateKey) -> StoreResult<()>;
    /// Returns whether a snapshot is stored under `key`.
    fn has_state(&self, key: StateKey) -> StoreResult<bool>;
}

/// SQLite-backed state store.
pub struct SqliteStateStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateStore<'conn> {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_state_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StateStore for SqliteStateStore<'_> {
    fn get_state(&self, key: StateKey) -> StoreResult<Option<ChecklistTree>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT state FROM selected_state WHERE id = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = raw else {
            debug!("event=state_get module=repo status=ok key={key} found=false");
            return Ok(None);
        };

        let tree: ChecklistTree = serde_json::from_str(&raw)?;
        tree.validate()?;
        debug!(
            "event=state_get module=repo status=ok key={} found=true bytes={}",
            key,
            raw.len()
        );
        Ok(Some(tree))
    }

    fn put_state(&self, key: StateKey, tree: &ChecklistTree) -> StoreResult<()> {
        let raw = serde_json::to_string(tree)?;
        self.conn.execute(
            "INSERT INTO selected_state (id, state, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(id) DO UPDATE SET
                state = excluded.state,
                updated_at = excluded.updated_at;",
            params![key, raw],
        )?;
        debug!(
            "event=state_put module=repo status=ok key={} bytes={}",
            key,
            raw.len()
        );
        Ok(())
    }

    fn delete_state(&self, key: StateKey) -> StoreResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM selected_state WHERE id = ?1;", [key])?;
        debug!("event=state_delete module=repo status=ok key={key} removed={removed}");
        Ok(())
    }

    fn has_state(&self, key: StateKey) -> StoreResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM selected_state WHERE id = ?1);",
            [key],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn ensure_state_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = STORE_VERSION;
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, STATE_TABLE)? {
        return Err(StoreError::MissingRequiredTable(STATE_TABLE));
    }

    for column in STATE_COLUMNS {
        if !table_has_column(conn, STATE_TABLE, column)? {
            return Err(StoreError::MissingRequiredColumn {
                table: STATE_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
