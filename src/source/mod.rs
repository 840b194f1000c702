// Candidate word sources.
//
// A word source produces the candidate words spellable from a rack. Two
// strategies exist behind one trait: an in-process lookup over the preloaded
// vocabulary, and a remote HTTP lookup. `SourceKind` is the config-selected
// wrapper the rest of the system holds.

mod local;
mod remote;

pub use local::LocalSource;
pub use remote::RemoteSource;

use crate::rack::Rack;
use async_trait::async_trait;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("word source unavailable: {0}")]
    Unavailable(String),

    #[error("word source returned an unusable payload: {0}")]
    Unparsable(String),
}

// ---------------------------------------------------------------------------
// WordSource trait
// ---------------------------------------------------------------------------

/// A strategy for producing candidate words for a rack.
///
/// The trait is async because the remote strategy involves network I/O.
/// Every implementation upholds the same post-filter contract: each returned
/// word is covered by the rack and at least `min_length` letters long, so
/// callers never re-check.
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Short strategy name for logging.
    fn name(&self) -> &'static str;

    /// All candidate words for `rack`, deduplicated and orderable.
    async fn candidates(
        &self,
        rack: &Rack,
        min_length: usize,
    ) -> Result<BTreeSet<String>, SourceError>;
}

// ---------------------------------------------------------------------------
// SourceKind dispatch
// ---------------------------------------------------------------------------

/// The configured word source strategy.
pub enum SourceKind {
    /// In-process lookup over the startup-loaded vocabulary.
    Local(LocalSource),
    /// HTTP lookup against an external listing service.
    Remote(RemoteSource),
}

#[async_trait]
impl WordSource for SourceKind {
    fn name(&self) -> &'static str {
        match self {
            SourceKind::Local(s) => s.name(),
            SourceKind::Remote(s) => s.name(),
        }
    }

    async fn candidates(
        &self,
        rack: &Rack,
        min_length: usize,
    ) -> Result<BTreeSet<String>, SourceError> {
        match self {
            SourceKind::Local(s) => s.candidates(rack, min_length).await,
            SourceKind::Remote(s) => s.candidates(rack, min_length).await,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
