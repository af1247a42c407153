//! Shared text shaping and truncation policies for compact UI surfaces.

use alloc::{format, string::String};

pub const TITLE_MAX_CHARS: usize = 50;
const TITLE_ELLIPSIS_AT: usize = 47;
const UNTITLED: &str = "Untitled Text";

const MINUTE_MS: u64 = 60_000;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

/// Title for pasted text: its first line, shortened with `...` when long.
pub fn title_from_text(text: &str) -> String {
    let first_line = text.split('\n').next().unwrap_or("").trim();
    if first_line.is_empty() {
        return String::from(UNTITLED);
    }

    if first_line.chars().count() <= TITLE_MAX_CHARS {
        return String::from(first_line);
    }

    let mut title: String = first_line.chars().take(TITLE_ELLIPSIS_AT).collect();
    title.push_str("...");
    title
}

/// Joins words with single spaces, stopping before `max_chars` and marking
/// the cut with `...`.
pub fn preview_limited<'a>(words: impl IntoIterator<Item = &'a str>, max_chars: usize) -> String {
    let mut out = String::new();
    let mut char_count = 0usize;
    let mut truncated = false;

    for word in words {
        let needed = word.chars().count() + usize::from(!out.is_empty());
        if char_count + needed > max_chars {
            truncated = true;
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        char_count += needed;
    }

    if truncated {
        out.push_str("...");
    }
    out
}

/// Coarse "time ago" label for a saved reading position.
pub fn time_ago_label(age_ms: u64) -> String {
    let days = age_ms / DAY_MS;
    let hours = age_ms / HOUR_MS;
    let minutes = age_ms / MINUTE_MS;

    match (days, hours, minutes) {
        (1, _, _) => String::from("1 day ago"),
        (d, _, _) if d > 1 => format!("{d} days ago"),
        (_, 1, _) => String::from("1 hour ago"),
        (_, h, _) if h > 1 => format!("{h} hours ago"),
        (_, _, 1) => String::from("1 minute ago"),
        (_, _, m) if m > 1 => format!("{m} minutes ago"),
        _ => String::from("just now"),
    }
}
