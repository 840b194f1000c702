// In-process candidate lookup over the preloaded vocabulary.

use crate::rack::Rack;
use crate::source::{SourceError, WordSource};
use crate::vocabulary::Vocabulary;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Filters the fixed vocabulary down to words the rack covers. The
/// vocabulary is immutable after startup, so lookups are pure.
pub struct LocalSource {
    vocabulary: Vocabulary,
}

impl LocalSource {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }
}

#[async_trait]
impl WordSource for LocalSource {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn candidates(
        &self,
        rack: &Rack,
        min_length: usize,
    ) -> Result<BTreeSet<String>, SourceError> {
        Ok(self
            .vocabulary
            .iter()
            .filter(|w| w.len() >= min_length && rack.covers(w))
            .map(str::to_string)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
