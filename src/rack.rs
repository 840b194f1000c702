// Rack parsing and multiset letter matching.
//
// A rack is the pool of letters available to spell with. Matching treats the
// rack and the candidate word as multisets: the word fits only if every
// letter it needs appears in the rack at least as many times as the word
// uses it.

use std::fmt;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RackError {
    #[error("rack is empty")]
    Empty,

    #[error("rack contains non-letter character '{0}'")]
    NonLetter(char),
}

// ---------------------------------------------------------------------------
// Rack
// ---------------------------------------------------------------------------

/// An uppercase-normalized letter pool with per-letter counts.
///
/// Construction validates, so every `Rack` in the system is non-empty and
/// pure ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rack {
    letters: String,
    counts: [u8; 26],
}

impl Rack {
    /// Parse user input into a rack: trim, uppercase, reject anything that
    /// is not an ASCII letter.
    pub fn parse(input: &str) -> Result<Rack, RackError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RackError::Empty);
        }
        let mut letters = String::with_capacity(trimmed.len());
        let mut counts = [0u8; 26];
        for ch in trimmed.chars() {
            if !ch.is_ascii_alphabetic() {
                return Err(RackError::NonLetter(ch));
            }
            let upper = ch.to_ascii_uppercase();
            let idx = (upper as u8 - b'A') as usize;
            counts[idx] = counts[idx].saturating_add(1);
            letters.push(upper);
        }
        Ok(Rack { letters, counts })
    }

    /// The normalized letters, in input order.
    pub fn as_str(&self) -> &str {
        &self.letters
    }

    /// True if `word` can be spelled from this rack, consuming each rack
    /// letter at most once. Case-insensitive on the word. The empty word and
    /// words containing non-letter characters never match.
    pub fn covers(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let mut needed = [0u8; 26];
        for ch in word.chars() {
            if !ch.is_ascii_alphabetic() {
                return false;
            }
            let idx = (ch.to_ascii_uppercase() as u8 - b'A') as usize;
            needed[idx] = needed[idx].saturating_add(1);
            if needed[idx] > self.counts[idx] {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Rack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
