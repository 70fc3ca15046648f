//! Local SQLite vector index: schema and initialization

use crate::error::{Result, SatPrepError};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Vector index stored in a SQLite file.
///
/// Several named indexes can share one file; every row is tagged with the
/// index name it was written under.
pub struct SqliteIndex {
    pub(crate) conn: Mutex<Connection>,
    pub(crate) name: String,
}

const SCHEMA_VERSION: i32 = 1;

const CREATE_TABLES: &str = r#"
-- Stored chunks with their embeddings
CREATE TABLE IF NOT EXISTS entries (
    id TEXT PRIMARY KEY,
    index_name TEXT NOT NULL,
    text TEXT NOT NULL,
    metadata TEXT NOT NULL,
    embedding BLOB NOT NULL,
    dimensions INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

CREATE INDEX IF NOT EXISTS idx_entries_index_name ON entries(index_name);
"#;

impl SqliteIndex {
    /// Open index at path, creating the file and schema if necessary
    pub fn open(path: impl AsRef<Path>, name: &str) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let index = Self {
            conn: Mutex::new(conn),
            name: name.to_string(),
        };
        index.initialize()?;
        Ok(index)
    }

    /// Open in-memory index (for testing)
    pub fn open_in_memory(name: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let index = Self {
            conn: Mutex::new(conn),
            name: name.to_string(),
        };
        index.initialize()?;
        Ok(index)
    }

    /// Initialize database schema
    fn initialize(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(CREATE_TABLES)?;
        conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> Result<Option<i32>> {
        let conn = self.lock()?;
        let version = conn
            .query_row(
                "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .ok();
        Ok(version)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SatPrepError::Index("SQLite connection mutex poisoned".to_string()))
    }
}
