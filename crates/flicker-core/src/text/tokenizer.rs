use alloc::{string::String, vec::Vec};

use super::{
    next_word_at,
    patterns::{
        NumericProfile, has_end_punctuation, has_lowercase, has_pause_punctuation, is_all_caps,
        is_numbered_header, is_section_break, starts_with_header_keyword,
    },
};

const SECTION_BREAK_PAUSE: f32 = 3.0;
const HEADER_PAUSE: f32 = 1.5;
const AFTER_BREAK_PAUSE: f32 = 1.3;
/// All-caps runs longer than this stop counting as header text.
const HEADER_CAPS_RUN: usize = 5;

/// One annotated token, borrowed from the normalized text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawWord<'a> {
    pub text: &'a str,
    pub has_end_punctuation: bool,
    pub has_pause_punctuation: bool,
    pub is_header: bool,
    pub is_section_break: bool,
    pub is_after_section_break: bool,
    pub has_numeric_content: bool,
    pub pause_multiplier: f32,
}

/// Splits normalized text into annotated tokens.
///
/// The only state carried between tokens is whether the previous token opened
/// a break and how many all-caps tokens have been seen in a row.
pub fn tokenize_words(text: &str) -> Vec<RawWord<'_>> {
    let mut tokens = Vec::new();
    let mut cursor = 0usize;
    while let Some((token, next_cursor)) = next_word_at(text, cursor) {
        tokens.push(token);
        cursor = next_cursor;
    }

    let last = tokens.len().saturating_sub(1);
    let mut words = Vec::with_capacity(tokens.len());
    let mut after_break = false;
    let mut caps_run = 0usize;

    for (i, &token) in tokens.iter().enumerate() {
        let section_break = is_section_break(token);
        let all_caps = is_all_caps(token);
        caps_run = if all_caps { caps_run.saturating_add(1) } else { 0 };

        let header = starts_with_header_keyword(token)
            || is_numbered_header(token)
            || (all_caps && caps_run <= HEADER_CAPS_RUN)
            || (after_break && i < last);

        let numeric = NumericProfile::of(token);

        let mut pause_multiplier = if section_break {
            SECTION_BREAK_PAUSE
        } else if header {
            HEADER_PAUSE
        } else if after_break {
            AFTER_BREAK_PAUSE
        } else {
            1.0
        };
        if let Some(floor) = numeric.pause_floor() {
            pause_multiplier = pause_multiplier.max(floor);
        }

        words.push(RawWord {
            text: token,
            has_end_punctuation: has_end_punctuation(token),
            has_pause_punctuation: has_pause_punctuation(token),
            is_header: header,
            is_section_break: section_break,
            is_after_section_break: after_break && !section_break,
            has_numeric_content: numeric.any(),
            pause_multiplier,
        });

        // A shouted line right after a sentence end reads like a heading.
        after_break = section_break
            || (i > 0 && has_end_punctuation(tokens[i - 1]) && !has_lowercase(token));
    }

    words
}

/// Keeps ASCII letters, apostrophes and hyphens.
pub fn clean_word(token: &str) -> String {
    token
        .chars()
        .filter(|ch| ch.is_ascii_alphabetic() || *ch == '\'' || *ch == '-')
        .collect()
}
