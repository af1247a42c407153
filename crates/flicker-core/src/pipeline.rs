//! Word builder: turns chapter text into the canonical `Word` sequence.

use alloc::{string::String, vec::Vec};
use core::fmt::Write;

use log::{debug, warn};

use crate::{
    orp::orp_char_index,
    text::{RawWord, clean_word, count_words, normalize_text, prepare_pasted_text, tokenize_words},
    text_policy::title_from_text,
};

/// Minimum pause applied to the first word of every chapter.
const CHAPTER_OPEN_PAUSE: f32 = 1.5;
/// Two 20-digit `usize`s and the separator.
pub const WORD_ID_BYTES: usize = 41;

pub type WordId = heapless::String<WORD_ID_BYTES>;

/// One displayable word with its timing annotations.
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    /// `"{chapter}_{index}"`, unique within a loaded sequence.
    pub id: WordId,
    pub text: String,
    pub clean_text: String,
    pub global_index: usize,
    pub chapter_index: usize,
    /// Char index into `text` of the fixation letter.
    pub orp_index: usize,
    pub has_end_punctuation: bool,
    pub has_pause_punctuation: bool,
    pub is_chapter_start: bool,
    pub is_chapter_end: bool,
    pub is_header: bool,
    pub is_section_break: bool,
    pub is_after_section_break: bool,
    pub has_numeric_content: bool,
    /// Natural pause weight, always `>= 1.0`.
    pub pause_multiplier: f32,
}

/// Maps tokenizer output for one chapter onto `Word`s.
pub fn build_chapter_words(raw_words: &[RawWord<'_>], chapter_index: usize) -> Vec<Word> {
    let last = raw_words.len().saturating_sub(1);

    raw_words
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let mut id = WordId::new();
            if write!(id, "{chapter_index}_{index}").is_err() {
                warn!("pipeline: word id overflow chapter={chapter_index} index={index}");
            }

            let pause_multiplier = if index == 0 {
                raw.pause_multiplier.max(CHAPTER_OPEN_PAUSE)
            } else {
                raw.pause_multiplier
            };

            Word {
                id,
                text: String::from(raw.text),
                clean_text: clean_word(raw.text),
                global_index: index,
                chapter_index,
                orp_index: orp_char_index(raw.text),
                has_end_punctuation: raw.has_end_punctuation,
                has_pause_punctuation: raw.has_pause_punctuation,
                is_chapter_start: index == 0,
                is_chapter_end: index == last,
                is_header: raw.is_header,
                is_section_break: raw.is_section_break,
                is_after_section_break: raw.is_after_section_break,
                has_numeric_content: raw.has_numeric_content,
                pause_multiplier,
            }
        })
        .collect()
}

/// Normalizes, tokenizes and builds one chapter.
pub fn process_text(raw_text: &str, chapter_index: usize) -> Vec<Word> {
    let normalized = normalize_text(raw_text);
    let raw_words = tokenize_words(&normalized);
    let words = build_chapter_words(&raw_words, chapter_index);
    debug!(
        "pipeline: chapter={} bytes={} words={}",
        chapter_index,
        raw_text.len(),
        words.len()
    );
    words
}

/// Concatenates chapters for continuous reading, renumbering `global_index`.
pub fn merge_chapter_words(chapters: impl IntoIterator<Item = Vec<Word>>) -> Vec<Word> {
    let mut merged = Vec::new();
    for chapter in chapters {
        merged.extend(chapter);
    }
    for (global_index, word) in merged.iter_mut().enumerate() {
        word.global_index = global_index;
    }
    merged
}

/// Pasted text ready for reading.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextContent {
    pub title: String,
    pub text: String,
    pub word_count: usize,
}

/// Builds chapter-0 words and metadata for pasted text. An empty or blank
/// `title` is replaced by one derived from the first line.
pub fn parse_text_input(text: &str, title: Option<&str>) -> (Vec<Word>, TextContent) {
    let cleaned = prepare_pasted_text(text);
    let words = process_text(&cleaned, 0);
    let title = match title.map(str::trim) {
        Some(title) if !title.is_empty() => String::from(title),
        _ => title_from_text(&cleaned),
    };

    let content = TextContent {
        title,
        word_count: words.len(),
        text: cleaned,
    };
    (words, content)
}

/// Whole minutes needed to read `word_count` words at `wpm`, rounded up.
pub fn estimate_reading_minutes(word_count: usize, wpm: u16) -> usize {
    word_count.div_ceil(usize::from(wpm.max(1)))
}

/// Minutes for raw, unprocessed text.
pub fn estimate_text_minutes(text: &str, wpm: u16) -> usize {
    estimate_reading_minutes(count_words(text), wpm)
}
