//! SQLite document database for patient records.
//!
//! One table, one JSON document per record. Insertion order is kept by an
//! autoincrement sequence so listings match the in-memory backend.

mod patients;
mod schema;

pub use schema::*;

use std::path::Path;

use rusqlite::{Connection, Transaction};
use thiserror::Error;
use tracing::debug;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Document encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Patient document collection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the collection stored at `path`, creating the file on first use.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        debug!(path = %path.as_ref().display(), "opening document database");
        Self::with_connection(Connection::open(path)?)
    }

    /// Open a private collection that lives as long as the value.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn transaction(&mut self) -> DbResult<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}
