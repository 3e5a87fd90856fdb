//! Durable key/value store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide a stable typed read/write API over persisted tool state.
//! - Keep SQL details inside the core persistence boundary.
//! - Absorb persistence failures at the adapter façade: reads fall back to
//!   caller-supplied defaults, writes degrade to in-memory-only.
//!
//! # Invariants
//! - One JSON document per key; last write wins per key.
//! - `StoreAdapter::read` never fails and never deletes a corrupt entry; the
//!   next successful write overwrites it.
//! - `StoreAdapter::write`/`delete` never propagate backend errors to callers.

use crate::db::DbError;
use log::{debug, error, warn};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Canonical persisted storage layout: one JSON value per key.
///
/// Key names are an external interface shared with every front end that
/// reads the same store; renaming one is a breaking change.
pub mod keys {
    pub const POMODORO_MINUTES: &str = "pomodoro-minutes";
    pub const POMODORO_SECONDS: &str = "pomodoro-seconds";
    pub const POMODORO_MODE: &str = "pomodoro-mode";
    pub const TODO_TASKS: &str = "todo-tasks";
    pub const FLASHCARD_DECKS: &str = "flashcard-decks";
    pub const FLASHCARD_ACTIVE_DECK: &str = "flashcard-activeDeck";
    pub const STUDY_NOTES: &str = "study-notes";
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence-layer error for key/value storage operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Storage medium cannot be reached (disabled storage, quota, ...).
    Unavailable(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage medium unavailable: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
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

/// Raw key/value persistence contract.
///
/// Implementations store opaque JSON strings; typed encoding lives in
/// [`StoreAdapter`]. Writes are single-threaded and last-write-wins per key,
/// so no locking is required.
pub trait KvBackend {
    fn load(&self, key: &str) -> StoreResult<Option<String>>;
    fn store(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// SQLite-backed key/value store over the `kv_entries` table.
pub struct SqliteKvBackend {
    conn: Connection,
}

impl SqliteKvBackend {
    /// Wraps a migrated connection after verifying the schema it relies on.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` when `kv_entries` is absent.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let expected_version = crate::db::migrations::latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries';",
            [],
            |row| row.get(0),
        )?;
        if table_count == 0 {
            return Err(StoreError::MissingRequiredTable("kv_entries"));
        }

        Ok(Self { conn })
    }
}

impl KvBackend for SqliteKvBackend {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv_entries WHERE key = ?1;")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn store(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", params![key])?;
        Ok(())
    }
}

/// Typed façade over a raw key/value backend.
///
/// All errors stop here: a read that cannot be decoded falls back to the
/// caller's default, a write that cannot be persisted is logged and dropped.
/// The in-memory session stays usable either way; only durability degrades.
pub struct StoreAdapter {
    backend: Box<dyn KvBackend>,
}

impl StoreAdapter {
    pub fn new(backend: Box<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Reads and decodes the value under `key`, or returns `default`.
    ///
    /// # Contract
    /// - Never fails: backend and decode errors are logged as fallbacks.
    /// - A corrupt entry is left in place for the next write to overwrite.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=store_read module=store status=absent key={key}");
                return default;
            }
            Err(err) => {
                warn!("event=store_read module=store status=fallback key={key} error={err}");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=store_read module=store status=fallback key={key} error_code=corrupt_entry error={err}"
                );
                default
            }
        }
    }

    /// Encodes `value` and persists it under `key`.
    ///
    /// # Contract
    /// - Never fails: a backend error is logged and the write is dropped
    ///   (durability silently degraded for this key until the next write).
    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=store_write module=store status=error key={key} error_code=encode_failed error={err}"
                );
                return;
            }
        };

        if let Err(err) = self.backend.store(key, &raw) {
            error!("event=store_write module=store status=error key={key} error={err}");
        }
    }

    /// Removes the entry under `key`; absence is not an error.
    pub fn delete(&self, key: &str) {
        if let Err(err) = self.backend.remove(key) {
            error!("event=store_delete module=store status=error key={key} error={err}");
        }
    }
}
