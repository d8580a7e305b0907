//! Database module for Koni Health
//!
//! SQLite-backed key-value blob store used as the Event Store's persistence
//! collaborator.

mod schema;

use schema::SCHEMA;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

const UPSERT_BLOB: &str = "INSERT INTO kv_blobs (key, blob, updated_at) VALUES (?1, ?2, ?3)
     ON CONFLICT(key) DO UPDATE SET blob = excluded.blob, updated_at = excluded.updated_at";

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_migrations(&self) -> DbResult<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Read a blob by key
    pub fn get_blob(&self, key: &str) -> DbResult<Option<String>> {
        let conn = self.conn();
        let blob = conn
            .query_row(
                "SELECT blob FROM kv_blobs WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(blob)
    }

    /// Insert or replace a blob
    pub fn put_blob(&self, key: &str, blob: &str) -> DbResult<()> {
        self.conn()
            .execute(UPSERT_BLOB, params![key, blob, Utc::now().to_rfc3339()])?;
        Ok(())
    }

    /// Insert or replace several blobs in one transaction; on error none are written
    pub fn put_blobs(&self, blobs: &[(&str, &str)]) -> DbResult<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        for (key, blob) in blobs {
            tx.execute(UPSERT_BLOB, params![key, blob, now])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Delete every stored blob
    pub fn clear_blobs(&self) -> DbResult<()> {
        self.conn().execute("DELETE FROM kv_blobs", [])?;
        Ok(())
    }

    /// Number of stored blobs
    #[allow(dead_code)] // Used in tests
    pub fn blob_count(&self) -> DbResult<i64> {
        let count = self
            .conn()
            .query_row("SELECT COUNT(*) FROM kv_blobs", [], |row| row.get(0))?;
        Ok(count)
    }
}
