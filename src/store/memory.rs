// In-memory list storage.
//
// Ephemeral backend for demos, and the failure-injection double the composer
// tests lean on. The raw append log is kept verbatim (duplicates included)
// so tests can assert exactly what was written.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::store::{ListStore, StoreError};

#[derive(Debug, Default)]
struct MemoryListStoreInner {
    /// Append log per list, in write order.
    lists: HashMap<String, Vec<String>>,
    fail_reads: bool,
    fail_writes: bool,
}

/// Thread-safe in-memory store; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryListStore {
    inner: Arc<Mutex<MemoryListStoreInner>>,
}

impl MemoryListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `read_list` calls fail with `StoreError::Unavailable`.
    pub fn fail_reads(&self, fail: bool) {
        self.inner().fail_reads = fail;
    }

    /// Make subsequent `append_words` calls fail with `StoreError::Unavailable`.
    pub fn fail_writes(&self, fail: bool) {
        self.inner().fail_writes = fail;
    }

    /// The raw append log for a list: write order, duplicates preserved,
    /// no normalization. Test inspection hook.
    pub fn appended(&self, name: &str) -> Vec<String> {
        self.inner().lists.get(name).cloned().unwrap_or_default()
    }

    /// Seed a list directly, bypassing the trait (test setup).
    pub fn seed(&self, name: &str, words: &[&str]) {
        self.inner()
            .lists
            .entry(name.to_string())
            .or_default()
            .extend(words.iter().map(|w| w.to_string()));
    }

    fn inner(&self) -> MutexGuard<'_, MemoryListStoreInner> {
        self.inner.lock().expect("memory store mutex poisoned")
    }
}

#[async_trait]
impl ListStore for MemoryListStore {
    async fn read_list(&self, name: &str) -> Result<BTreeSet<String>, StoreError> {
        let inner = self.inner();
        if inner.fail_reads {
            return Err(StoreError::Unavailable("simulated read failure".into()));
        }
        Ok(inner
            .lists
            .get(name)
            .map(|words| {
                words
                    .iter()
                    .map(|w| w.trim().to_ascii_uppercase())
                    .filter(|w| !w.is_empty())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn append_words(&self, name: &str, words: &[String]) -> Result<(), StoreError> {
        let mut inner = self.inner();
        if inner.fail_writes {
            return Err(StoreError::Unavailable("simulated write failure".into()));
        }
        inner
            .lists
            .entry(name.to_string())
            .or_default()
            .extend(words.iter().cloned());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DENYLIST, SEEN_WORDS};

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test]
    async fn round_trip_normalizes_and_dedups_on_read() {
        let store = MemoryListStore::new();
        store.seed(DENYLIST, &[" pre ", "PRE", "bum"]);

        let list = store.read_list(DENYLIST).await.unwrap();
        let got: Vec<&str> = list.iter().map(String::as_str).collect();
        assert_eq!(got, vec!["BUM", "PRE"]);
    }

    #[tokio::test]
    async fn missing_list_reads_empty() {
        let store = MemoryListStore::new();
        assert!(store.read_list(DENYLIST).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_log_preserves_duplicates_and_order() {
        let store = MemoryListStore::new();
        store.append_words(SEEN_WORDS, &words(&["RATE", "TEAR"])).await.unwrap();
        store.append_words(SEEN_WORDS, &words(&["RATE"])).await.unwrap();

        assert_eq!(store.appended(SEEN_WORDS), words(&["RATE", "TEAR", "RATE"]));
        // The snapshot still dedups.
        assert_eq!(store.read_list(SEEN_WORDS).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn read_failure_injection() {
        let store = MemoryListStore::new();
        store.seed(DENYLIST, &["PRE"]);

        store.fail_reads(true);
        let err = store.read_list(DENYLIST).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        store.fail_reads(false);
        assert!(store.read_list(DENYLIST).await.unwrap().contains("PRE"));
    }

    #[tokio::test]
    async fn write_failure_injection_records_nothing() {
        let store = MemoryListStore::new();
        store.fail_writes(true);

        let err = store
            .append_words(DENYLIST, &words(&["PRE"]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(store.appended(DENYLIST).is_empty());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryListStore::new();
        let clone = store.clone();
        clone.append_words(DENYLIST, &words(&["PRE"])).await.unwrap();

        assert!(store.read_list(DENYLIST).await.unwrap().contains("PRE"));
    }
}
