// SQLite-backed list storage.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};

use crate::store::{ListStore, StoreError};

/// Durable list storage in a single SQLite file. Every client of the lists
/// shares the file, so WAL mode and a busy timeout keep concurrent access
/// civil.
pub struct SqliteListStore {
    conn: Mutex<Connection>,
}

impl SqliteListStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    /// Pass `":memory:"` for an ephemeral database (useful for tests).
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| {
            StoreError::Unavailable(format!("failed to open database at {path}: {e}"))
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(|e| StoreError::Unavailable(format!("failed to set database pragmas: {e}")))?;

        // The composite primary key makes re-appends no-ops at the backend,
        // so the additive contract stays cheap even for high-volume lists.
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS list_words (
                list_name TEXT NOT NULL,
                word      TEXT NOT NULL,
                added_at  TEXT NOT NULL,
                PRIMARY KEY (list_name, word)
            );
            ",
        )
        .map_err(|e| StoreError::Unavailable(format!("failed to create list schema: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }
}

#[async_trait]
impl ListStore for SqliteListStore {
    async fn read_list(&self, name: &str) -> Result<BTreeSet<String>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT word FROM list_words WHERE list_name = ?1")
            .map_err(|e| StoreError::Unavailable(format!("failed to prepare list query: {e}")))?;

        let rows = stmt
            .query_map(params![name], |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::Unavailable(format!("failed to query list {name}: {e}")))?;

        // Normalize on read as well as write: other clients of the shared
        // file may store words in any case.
        let mut words = BTreeSet::new();
        for row in rows {
            let word = row
                .map_err(|e| StoreError::Unavailable(format!("failed to read list row: {e}")))?;
            let normalized = word.trim().to_ascii_uppercase();
            if !normalized.is_empty() {
                words.insert(normalized);
            }
        }
        Ok(words)
    }

    async fn append_words(&self, name: &str, words: &[String]) -> Result<(), StoreError> {
        if words.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn();
        let tx = conn.transaction().map_err(|e| {
            StoreError::Unavailable(format!("failed to start append transaction: {e}"))
        })?;
        let added_at = Utc::now().to_rfc3339();
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO list_words (list_name, word, added_at)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(list_name, word) DO NOTHING",
                )
                .map_err(|e| {
                    StoreError::Unavailable(format!("failed to prepare append statement: {e}"))
                })?;
            for word in words {
                let normalized = word.trim().to_ascii_uppercase();
                if normalized.is_empty() {
                    continue;
                }
                stmt.execute(params![name, normalized, added_at]).map_err(|e| {
                    StoreError::Unavailable(format!("failed to append to list {name}: {e}"))
                })?;
            }
        }
        tx.commit()
            .map_err(|e| StoreError::Unavailable(format!("failed to commit append: {e}")))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
