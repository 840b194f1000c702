// Display formatting.
//
// Renders a resolved word list as the monospace HTML fragment the front end
// drops into its results pane. Words arrive sorted and uppercase; grouping
// preserves that order. Every word is wrapped in a span carrying its own
// value so the UI can make each one clickable.

use std::collections::BTreeMap;

use crate::config::DisplayConfig;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DisplayOptions {
    /// Words per rendered row.
    pub columns: usize,
    /// Length-tiered layout instead of the flat letter grouping.
    pub tiered: bool,
    /// Inclusive length range pulled out first in tiered mode.
    pub notable_min: usize,
    pub notable_max: usize,
}

impl DisplayOptions {
    pub fn from_config(cfg: &DisplayConfig) -> Self {
        DisplayOptions {
            columns: cfg.columns,
            tiered: cfg.tiered,
            notable_min: cfg.notable_min,
            notable_max: cfg.notable_max,
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            columns: 5,
            tiered: false,
            notable_min: 6,
            notable_max: 7,
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the final fragment. An empty word list yields the placeholder
/// line instead of an empty string.
pub fn render(words: &[String], min_length: usize, opts: &DisplayOptions) -> String {
    if words.is_empty() {
        return format!("(No {min_length}+-letter anagrams)");
    }
    if opts.tiered {
        render_tiered(words, min_length, opts)
    } else {
        grouped_lines(words, opts.columns).join("\n")
    }
}

/// Letter-grouped lines: one numbered block per leading letter, rows wrapped
/// at `cols` words, continuation rows padded to the prefix width, and a
/// blank line closing each block.
fn grouped_lines(words: &[String], cols: usize) -> Vec<String> {
    let mut groups: BTreeMap<char, Vec<&str>> = BTreeMap::new();
    for word in words {
        let Some(letter) = word.chars().next() else {
            continue;
        };
        groups.entry(letter).or_default().push(word);
    }

    let mut lines = Vec::new();
    for (idx, (letter, group)) in groups.iter().enumerate() {
        let idx = idx + 1;
        let prefix = format!("{idx:>3}. {letter}: ");
        let pad = " ".repeat(prefix.len());
        for (row_idx, row) in group.chunks(cols).enumerate() {
            let body = row.iter().map(|w| tag(w)).collect::<Vec<_>>().join(" ");
            let lead = if row_idx == 0 { &prefix } else { &pad };
            lines.push(format!("{lead}{body}"));
        }
        lines.push(String::new());
    }
    lines
}

/// Tiered layout: the notable length range first under its own heading, the
/// middle lengths letter-grouped as usual, and the minimum-length words last
/// under a closing heading. Empty sections are omitted.
fn render_tiered(words: &[String], min_length: usize, opts: &DisplayOptions) -> String {
    let mut notable = Vec::new();
    let mut middle = Vec::new();
    let mut tail = Vec::new();
    for word in words {
        let len = word.len();
        if (opts.notable_min..=opts.notable_max).contains(&len) {
            notable.push(word.clone());
        } else if len == min_length {
            tail.push(word.clone());
        } else {
            middle.push(word.clone());
        }
    }

    let mut lines = Vec::new();
    if !notable.is_empty() {
        lines.push(heading(opts.notable_min, opts.notable_max));
        push_rows(&mut lines, &notable, opts.columns);
        lines.push(String::new());
    }
    if !middle.is_empty() {
        lines.extend(grouped_lines(&middle, opts.columns));
    }
    if !tail.is_empty() {
        lines.push(heading(min_length, min_length));
        push_rows(&mut lines, &tail, opts.columns);
        lines.push(String::new());
    }
    lines.join("\n")
}

fn heading(min: usize, max: usize) -> String {
    if min == max {
        format!("== {min} LETTER WORDS ==")
    } else {
        format!("== {min}-{max} LETTER WORDS ==")
    }
}

fn push_rows(lines: &mut Vec<String>, words: &[String], cols: usize) {
    for row in words.chunks(cols) {
        lines.push(row.iter().map(|w| tag(w)).collect::<Vec<_>>().join(" "));
    }
}

/// Clickable markup for one word; the UI reads `data-w` on click. Words are
/// uppercase A-Z by the time they render, so no escaping is needed.
fn tag(word: &str) -> String {
    format!("<span class=\"word\" data-w=\"{word}\">{word}</span>")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
