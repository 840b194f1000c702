// Query parameter parsing.
//
// The outer surface (HTTP router or CLI) hands over optional raw strings.
// Parsing here is the only place a user-correctable error can arise;
// everything past this point holds a well-formed query.

use crate::rack::{Rack, RackError};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("rack param missing")]
    MissingRack,

    #[error("rack must contain only letters")]
    BadRack,

    #[error("min_length must be a number")]
    BadMinLength,

    #[error("min_length must be at least 1")]
    MinLengthTooSmall,
}

/// Wire shape for the user-visible error response.
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl QueryError {
    /// The `{"error": ...}` payload the outer surface serves with a
    /// 400-class status.
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A validated query: non-empty rack, minimum length of at least 1, and
/// normalized manual allow/deny entries.
#[derive(Debug, Clone)]
pub struct Query {
    pub rack: Rack,
    pub min_length: usize,
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

impl Query {
    /// Parse the raw request parameters. `default_min_length` fills in when
    /// the min_length parameter is absent.
    pub fn from_params(
        rack: Option<&str>,
        min_length: Option<&str>,
        allow: Option<&str>,
        deny: Option<&str>,
        default_min_length: usize,
    ) -> Result<Query, QueryError> {
        let rack = Rack::parse(rack.unwrap_or("")).map_err(|e| match e {
            RackError::Empty => QueryError::MissingRack,
            RackError::NonLetter(_) => QueryError::BadRack,
        })?;

        let min_length = match min_length {
            Some(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| QueryError::BadMinLength)?,
            None => default_min_length as i64,
        };
        if min_length < 1 {
            return Err(QueryError::MinLengthTooSmall);
        }

        Ok(Query {
            rack,
            min_length: min_length as usize,
            allow: parse_word_list(allow),
            deny: parse_word_list(deny),
        })
    }
}

/// Split a comma-separated parameter into trimmed uppercase entries,
/// dropping empties. Entries are not letter-checked: a junk entry can never
/// match a rack, so it is harmless.
fn parse_word_list(param: Option<&str>) -> Vec<String> {
    param
        .map(|text| {
            text.split(',')
                .map(|w| w.trim().to_ascii_uppercase())
                .filter(|w| !w.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
