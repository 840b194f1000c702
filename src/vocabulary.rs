// Ranked vocabulary loading and normalization.
//
// Reads a word-frequency CSV (Word,Zipf columns, most common first) and keeps
// the rows that clear the configured Zipf threshold and length floor, up to a
// row cap. The result is an immutable uppercase word set built once at
// startup and shared read-only for the process lifetime.

use crate::config::VocabularyConfig;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Public type
// ---------------------------------------------------------------------------

/// The fixed pool of common words, uppercase-normalized and deduplicated.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: HashSet<String>,
}

impl Vocabulary {
    /// Load the vocabulary from the CSV path in the config.
    pub fn load(cfg: &VocabularyConfig) -> Result<Vocabulary, VocabularyError> {
        let path = Path::new(&cfg.path);
        let file = std::fs::File::open(path).map_err(|e| VocabularyError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let words = load_words_from_reader(file, cfg).map_err(|e| VocabularyError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;
        if words.is_empty() {
            return Err(VocabularyError::Validation(
                "vocabulary CSV produced zero valid rows".into(),
            ));
        }
        Ok(Vocabulary { words })
    }

    /// Build a vocabulary from an explicit word list (uppercased, deduplicated).
    /// Exposed for testing and flexibility.
    pub fn from_words<I, S>(words: I) -> Vocabulary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Vocabulary {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_ascii_uppercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.trim().to_ascii_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Ranked-list row. Extra columns (rank, part of speech, per-corpus counts)
/// are silently absorbed via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawRankedWord {
    #[serde(alias = "word")]
    Word: String,
    #[serde(alias = "zipf", alias = "ZIPF")]
    Zipf: f64,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_words_from_reader<R: Read>(
    rdr: R,
    cfg: &VocabularyConfig,
) -> Result<HashSet<String>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut words = HashSet::new();
    let mut rows_read = 0usize;
    for result in reader.deserialize::<RawRankedWord>() {
        // The cap bounds rows read from the ranked list, not rows kept.
        if rows_read >= cfg.max_words {
            break;
        }
        rows_read += 1;
        match result {
            Ok(raw) => {
                if !raw.Zipf.is_finite() {
                    warn!(
                        "skipping vocabulary entry '{}': non-finite Zipf value",
                        raw.Word.trim()
                    );
                    continue;
                }
                if raw.Zipf < cfg.zipf_threshold {
                    continue;
                }
                let word = raw.Word.trim().to_ascii_uppercase();
                if word.len() < cfg.min_word_length {
                    continue;
                }
                if !word.bytes().all(|b| b.is_ascii_alphabetic()) {
                    continue;
                }
                words.insert(word);
            }
            Err(e) => {
                warn!("skipping malformed vocabulary row: {}", e);
            }
        }
    }
    Ok(words)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
