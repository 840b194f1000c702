// Remote candidate lookup over HTTP.
//
// Fetches a per-rack listing from a configured URL template and extracts the
// letter runs from the response body (tag regions are dropped first, so HTML
// listings work as well as plain text). Extracted words are re-checked
// against the rack locally; an inexact upstream match can never leak
// through.

use crate::config::SourceConfig;
use crate::rack::Rack;
use crate::source::{SourceError, WordSource};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::debug;

pub struct RemoteSource {
    http: reqwest::Client,
    url_template: String,
    timeout: Duration,
}

impl RemoteSource {
    /// Create a source with an explicit URL template and request timeout.
    /// The template must contain a `{rack}` placeholder.
    pub fn new(url_template: String, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            url_template,
            timeout,
        }
    }

    pub fn from_config(cfg: &SourceConfig) -> Self {
        Self::new(
            cfg.remote_url.clone(),
            Duration::from_secs(cfg.timeout_secs),
        )
    }
}

#[async_trait]
impl WordSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn candidates(
        &self,
        rack: &Rack,
        min_length: usize,
    ) -> Result<BTreeSet<String>, SourceError> {
        let url = self.url_template.replace("{rack}", rack.as_str());
        debug!("fetching remote candidates from {url}");

        // Single attempt with a bounded timeout; expiry is an Unavailable
        // like any other transport failure.
        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!(
                "{url} returned status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Unavailable(format!("failed to read body from {url}: {e}")))?;

        if body.trim().is_empty() {
            return Err(SourceError::Unparsable(format!(
                "{url} returned an empty body"
            )));
        }

        Ok(extract_words(&body)
            .into_iter()
            .filter(|w| w.len() >= min_length && rack.covers(w))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Body parsing
// ---------------------------------------------------------------------------

/// Pull candidate tokens out of an HTML or plain-text listing: skip `<...>`
/// tag regions, then collect maximal ASCII-letter runs, uppercased.
fn extract_words(body: &str) -> BTreeSet<String> {
    let mut words = BTreeSet::new();
    let mut run = String::new();
    let mut in_tag = false;
    for ch in body.chars() {
        if in_tag {
            if ch == '>' {
                in_tag = false;
            }
            continue;
        }
        if ch == '<' {
            in_tag = true;
            push_run(&mut run, &mut words);
            continue;
        }
        if ch.is_ascii_alphabetic() {
            run.push(ch.to_ascii_uppercase());
        } else {
            push_run(&mut run, &mut words);
        }
    }
    push_run(&mut run, &mut words);
    words
}

fn push_run(run: &mut String, words: &mut BTreeSet<String>) {
    if !run.is_empty() {
        words.insert(std::mem::take(run));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
