// Result composition.
//
// One query resolves in a fixed order: candidates from the word source, live
// allow/deny snapshots from the store, the request's manual additions, then
// a single merge in which the deny side always wins. Adapter failures
// degrade the result and surface as warnings; nothing here aborts a query.

use std::collections::BTreeSet;

use tracing::warn;

use crate::query::Query;
use crate::source::WordSource;
use crate::store::{self, ListStore};

/// Words banned unconditionally, independent of the stored denylist.
pub const HARD_DENYLIST: &[&str] = &["PRE", "BUM"];

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// A degraded step observed during `resolve`. The response is still served;
/// these carry what was skipped or lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    SourceDegraded { reason: String },
    StoreReadFailed { list: &'static str, reason: String },
    StoreWriteFailed { list: &'static str, reason: String },
}

/// The outcome of one resolved query.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Final display words, sorted ascending.
    pub words: Vec<String>,
    /// Degraded steps, empty on a clean resolve.
    pub warnings: Vec<ResolveWarning>,
}

impl Resolution {
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

pub struct Composer<S, L> {
    source: S,
    store: L,
}

impl<S: WordSource, L: ListStore> Composer<S, L> {
    pub fn new(source: S, store: L) -> Self {
        Self { source, store }
    }

    /// Resolve one query end to end.
    pub async fn resolve(&self, query: &Query) -> Resolution {
        let mut warnings = Vec::new();

        // Candidates from the source. On failure the query still runs;
        // manual allow entries can produce results on their own.
        let candidates = match self
            .source
            .candidates(&query.rack, query.min_length)
            .await
        {
            Ok(words) => words,
            Err(e) => {
                warn!("word source '{}' failed: {e}", self.source.name());
                warnings.push(ResolveWarning::SourceDegraded {
                    reason: e.to_string(),
                });
                BTreeSet::new()
            }
        };

        // Live list snapshots. Reads fail open: a missing denylist restricts
        // nothing, a missing allowlist adds nothing.
        let deny_snapshot = self.read_list_or_empty(store::DENYLIST, &mut warnings).await;
        let allow_snapshot = self.read_list_or_empty(store::ALLOWLIST, &mut warnings).await;

        // Persist the request's manual additions for future queries, skipping
        // words the snapshots already hold. Best-effort.
        self.append_new(store::ALLOWLIST, &query.allow, &allow_snapshot, &mut warnings)
            .await;
        self.append_new(store::DENYLIST, &query.deny, &deny_snapshot, &mut warnings)
            .await;

        // Union the request's own entries locally so this response reflects
        // them even if the store lags or the write was dropped.
        let mut live_deny = deny_snapshot;
        live_deny.extend(query.deny.iter().cloned());
        live_deny.extend(HARD_DENYLIST.iter().map(|w| w.to_string()));

        let mut live_allow = allow_snapshot;
        live_allow.extend(query.allow.iter().cloned());

        // Allow entries are held to the same rack and length rules as
        // candidates. Deny needs no such check; it only ever removes.
        let valid_allow: BTreeSet<String> = live_allow
            .into_iter()
            .filter(|w| w.len() >= query.min_length && query.rack.covers(w))
            .collect();

        // The merge: deny wins over both candidates and allows.
        let display: Vec<String> = candidates
            .union(&valid_allow)
            .filter(|w| !live_deny.contains(*w))
            .cloned()
            .collect();

        // Audit trail records what the source produced, pre-merge, so later
        // analysis sees even the words the lists then suppressed.
        if !candidates.is_empty() {
            let seen: Vec<String> = candidates.iter().cloned().collect();
            if let Err(e) = self.store.append_words(store::SEEN_WORDS, &seen).await {
                warn!("failed to record seen words: {e}");
                warnings.push(ResolveWarning::StoreWriteFailed {
                    list: store::SEEN_WORDS,
                    reason: e.to_string(),
                });
            }
        }

        Resolution {
            words: display,
            warnings,
        }
    }

    async fn read_list_or_empty(
        &self,
        list: &'static str,
        warnings: &mut Vec<ResolveWarning>,
    ) -> BTreeSet<String> {
        match self.store.read_list(list).await {
            Ok(words) => words,
            Err(e) => {
                warn!("failed to read {list}: {e}");
                warnings.push(ResolveWarning::StoreReadFailed {
                    list,
                    reason: e.to_string(),
                });
                BTreeSet::new()
            }
        }
    }

    async fn append_new(
        &self,
        list: &'static str,
        requested: &[String],
        snapshot: &BTreeSet<String>,
        warnings: &mut Vec<ResolveWarning>,
    ) {
        let new_words: Vec<String> = requested
            .iter()
            .filter(|w| !snapshot.contains(*w))
            .cloned()
            .collect();
        if new_words.is_empty() {
            return;
        }
        if let Err(e) = self.store.append_words(list, &new_words).await {
            warn!("failed to append to {list}: {e}");
            warnings.push(ResolveWarning::StoreWriteFailed {
                list,
                reason: e.to_string(),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
