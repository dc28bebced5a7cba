// ABOUTME: Persistence layer for classtrack, flattening the object graph to SQLite.
// ABOUTME: Provides schema creation, total-replace save, and reference-resolving load.

use std::path::PathBuf;

use classtrack_core::{Course, User};
use rusqlite::Connection;
use thiserror::Error;

pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::{LoadOutcome, LoadWarning};

/// Errors that can occur during store operations. All variants are fatal to
/// the calling operation; row-level resolution gaps during load are not
/// errors (see LoadWarning).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[source] rusqlite::Error),

    #[error("schema inconsistent: {0}")]
    SchemaInconsistent(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Handle to a classtrack database file. Each operation opens its own
/// connection and releases it when the operation returns, on every path.
/// Access is synchronous and single-threaded; a save is one transaction.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.path).map_err(StoreError::Unavailable)
    }

    /// Create every table if absent. Safe to call on every process start;
    /// never touches existing rows.
    pub fn create_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        schema::create_tables(&conn)
    }

    /// Persist the full in-memory state as a total-replace snapshot: every
    /// table is cleared and rewritten from the given graph in one
    /// transaction. Any failure rolls the whole save back.
    pub fn save(
        &self,
        users: &[User],
        courses: &[Course],
        logs: &[String],
    ) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        writer::save(&mut conn, users, courses, logs)
    }

    /// Rebuild the full in-memory graph from the stored rows, resolving
    /// natural-key references through a username index. The previous
    /// in-memory state plays no part; callers replace it with the outcome.
    pub fn load(&self) -> Result<LoadOutcome, StoreError> {
        let conn = self.connect()?;
        reader::load(&conn)
    }
}
