//! View models handed to whatever draws the reader.

use alloc::string::String;

use crate::{orp::OrpSplit, pipeline::Word, playback::PlaybackState, text_policy::preview_limited};

/// Snapshot of the reader for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReaderView<'a> {
    /// `None` for an empty sequence.
    pub word: Option<&'a Word>,
    pub split: OrpSplit<'a>,
    pub state: PlaybackState,
    pub index: usize,
    pub total: usize,
    pub progress_percent: f32,
    pub wpm: u16,
}

/// Current sentence with the shown word highlighted, plus the next sentence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContextPreview<'a> {
    pub current: &'a [Word],
    /// Offset of the shown word inside `current`.
    pub highlight: usize,
    pub next: Option<&'a [Word]>,
}

impl ContextPreview<'_> {
    pub fn highlighted(&self) -> Option<&Word> {
        self.current.get(self.highlight)
    }

    /// Words of the current sentence before, at and after the highlight.
    pub fn current_parts(&self) -> (&[Word], Option<&Word>, &[Word]) {
        let split = self.highlight.min(self.current.len());
        let (before, rest) = self.current.split_at(split);
        match rest.split_first() {
            Some((word, after)) => (before, Some(word), after),
            None => (before, None, rest),
        }
    }

    pub fn next_text(&self, max_chars: usize) -> Option<String> {
        self.next
            .map(|words| preview_limited(words.iter().map(|word| word.text.as_str()), max_chars))
    }
}
