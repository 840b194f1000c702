// External list storage.
//
// The allow/deny/seen lists live in a store shared with other clients, so
// every read is a fresh snapshot and every write is additive. The trait is
// the narrow seam the composer talks through; failures are a typed condition
// it degrades around, never a crash.

mod memory;
mod sqlite;

pub use memory::MemoryListStore;
pub use sqlite::SqliteListStore;

use async_trait::async_trait;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// List names
// ---------------------------------------------------------------------------

/// Words banned from display.
pub const DENYLIST: &str = "Denylist";
/// Manual additions that bypass the vocabulary (still rack-checked).
pub const ALLOWLIST: &str = "Allowlist";
/// Audit trail of every candidate the source has produced.
pub const SEEN_WORDS: &str = "SeenWords";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("list store unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// ListStore trait
// ---------------------------------------------------------------------------

/// Named word lists in the external store.
///
/// `read_list` returns a normalized snapshot (trimmed, uppercased,
/// deduplicated); nothing is cached across calls. `append_words` only adds,
/// and re-appending an existing word is harmless. Callers already holding a
/// snapshot pre-check membership to keep write volume down.
#[async_trait]
pub trait ListStore: Send + Sync {
    async fn read_list(&self, name: &str) -> Result<BTreeSet<String>, StoreError>;

    async fn append_words(&self, name: &str, words: &[String]) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// StoreKind dispatch
// ---------------------------------------------------------------------------

/// The configured store backend.
pub enum StoreKind {
    /// Durable single-file SQLite database.
    Sqlite(SqliteListStore),
    /// Ephemeral in-process store.
    Memory(MemoryListStore),
}

#[async_trait]
impl ListStore for StoreKind {
    async fn read_list(&self, name: &str) -> Result<BTreeSet<String>, StoreError> {
        match self {
            StoreKind::Sqlite(s) => s.read_list(name).await,
            StoreKind::Memory(s) => s.read_list(name).await,
        }
    }

    async fn append_words(&self, name: &str, words: &[String]) -> Result<(), StoreError> {
        match self {
            StoreKind::Sqlite(s) => s.append_words(name, words).await,
            StoreKind::Memory(s) => s.append_words(name, words).await,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
