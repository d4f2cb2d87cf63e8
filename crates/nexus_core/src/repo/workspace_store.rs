//! Workspace store contract and SQLite key-value implementation.
//!
//! # Responsibility
//! - Load and save whole note/habit collections as JSON documents.
//!
//! # Invariants
//! - Each collection is written atomically as one value.
//! - `replace_collections` writes every given collection in one transaction.
//! - A missing key reads as an empty collection.
//! - Corrupt stored JSON is reported, never replaced with defaults.

use crate::db::DbError;
use crate::model::habit::Habit;
use crate::model::note::Note;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NOTES_KEY: &str = "nexus_notes";
pub const HABITS_KEY: &str = "nexus_habits";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for workspace persistence.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData { key: String, message: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid stored value for `{key}`: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData { .. } => None,
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

/// Persistence boundary for workspace collections.
pub trait WorkspaceStore {
    fn load_notes(&self) -> StoreResult<Vec<Note>>;
    fn save_notes(&self, notes: &[Note]) -> StoreResult<()>;
    fn load_habits(&self) -> StoreResult<Vec<Habit>>;
    fn save_habits(&self, habits: &[Habit]) -> StoreResult<()>;

    /// Replaces the given collections; `None` leaves a collection untouched.
    ///
    /// The default writes one collection after the other. Transactional
    /// stores override it so either every collection is written or none is.
    fn replace_collections(
        &self,
        notes: Option<&[Note]>,
        habits: Option<&[Habit]>,
    ) -> StoreResult<()> {
        if let Some(notes) = notes {
            self.save_notes(notes)?;
        }
        if let Some(habits) = habits {
            self.save_habits(habits)?;
        }
        Ok(())
    }
}

/// SQLite-backed store over the `kv_store` table.
pub struct SqliteWorkspaceStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkspaceStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn read_value<T: DeserializeOwned + Default>(&self, key: &str) -> StoreResult<T> {
        let raw = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        match raw {
            None => Ok(T::default()),
            Some(text) => serde_json::from_str(&text).map_err(|err| StoreError::InvalidData {
                key: key.to_string(),
                message: err.to_string(),
            }),
        }
    }
}

fn write_value<T: Serialize + ?Sized>(conn: &Connection, key: &str, value: &T) -> StoreResult<()> {
    let text = serde_json::to_string(value).map_err(|err| StoreError::InvalidData {
        key: key.to_string(),
        message: err.to_string(),
    })?;
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at)
         VALUES (?1, ?2, strftime('%s', 'now') * 1000)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at;",
        params![key, text],
    )?;
    Ok(())
}

impl WorkspaceStore for SqliteWorkspaceStore<'_> {
    fn load_notes(&self) -> StoreResult<Vec<Note>> {
        self.read_value(NOTES_KEY)
    }

    fn save_notes(&self, notes: &[Note]) -> StoreResult<()> {
        write_value(self.conn, NOTES_KEY, notes)
    }

    fn load_habits(&self) -> StoreResult<Vec<Habit>> {
        self.read_value(HABITS_KEY)
    }

    fn save_habits(&self, habits: &[Habit]) -> StoreResult<()> {
        write_value(self.conn, HABITS_KEY, habits)
    }

    fn replace_collections(
        &self,
        notes: Option<&[Note]>,
        habits: Option<&[Habit]>,
    ) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if let Some(notes) = notes {
            write_value(&tx, NOTES_KEY, notes)?;
        }
        if let Some(habits) = habits {
            write_value(&tx, HABITS_KEY, habits)?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl<S: WorkspaceStore + ?Sized> WorkspaceStore for &S {
    fn load_notes(&self) -> StoreResult<Vec<Note>> {
        (**self).load_notes()
    }

    fn save_notes(&self, notes: &[Note]) -> StoreResult<()> {
        (**self).save_notes(notes)
    }

    fn load_habits(&self) -> StoreResult<Vec<Habit>> {
        (**self).load_habits()
    }

    fn save_habits(&self, habits: &[Habit]) -> StoreResult<()> {
        (**self).save_habits(habits)
    }

    fn replace_collections(
        &self,
        notes: Option<&[Note]>,
        habits: Option<&[Habit]>,
    ) -> StoreResult<()> {
        (**self).replace_collections(notes, habits)
    }
}
