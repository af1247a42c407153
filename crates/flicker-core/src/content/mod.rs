//! Chapter text sources.

use alloc::{string::String, vec::Vec};

use log::debug;

use crate::pipeline::{Word, merge_chapter_words, process_text};

/// Read-only list of chapters, each a block of plain text.
pub trait ChapterSource {
    type Error;

    fn chapter_count(&self) -> usize;

    fn chapter_title(&self, index: usize) -> Option<&str>;

    /// Raw text for a chapter, `None` when the index is out of range.
    fn chapter_text(&mut self, index: usize) -> Result<Option<&str>, Self::Error>;

    fn has_chapter(&self, index: usize) -> bool {
        index < self.chapter_count()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Chapter {
    pub title: String,
    pub text: String,
}

/// In-memory chapters.
#[derive(Clone, Debug, Default)]
pub struct StaticChapterSource {
    chapters: Vec<Chapter>,
}

impl StaticChapterSource {
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self { chapters }
    }

    pub fn push(&mut self, title: impl Into<String>, text: impl Into<String>) {
        self.chapters.push(Chapter {
            title: title.into(),
            text: text.into(),
        });
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }
}

impl ChapterSource for StaticChapterSource {
    type Error = core::convert::Infallible;

    fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    fn chapter_title(&self, index: usize) -> Option<&str> {
        self.chapters.get(index).map(|chapter| chapter.title.as_str())
    }

    fn chapter_text(&mut self, index: usize) -> Result<Option<&str>, Self::Error> {
        Ok(self.chapters.get(index).map(|chapter| chapter.text.as_str()))
    }
}

/// Word sequence for one chapter; empty when the chapter does not exist.
pub fn chapter_words<S>(source: &mut S, chapter_index: usize) -> Result<Vec<Word>, S::Error>
where
    S: ChapterSource,
{
    let words = match source.chapter_text(chapter_index)? {
        Some(text) => process_text(text, chapter_index),
        None => Vec::new(),
    };
    Ok(words)
}

/// Every chapter merged into one sequence for continuous reading.
pub fn book_words<S>(source: &mut S) -> Result<Vec<Word>, S::Error>
where
    S: ChapterSource,
{
    let count = source.chapter_count();
    let mut chapters = Vec::with_capacity(count);
    for chapter_index in 0..count {
        chapters.push(chapter_words(source, chapter_index)?);
    }

    let words = merge_chapter_words(chapters);
    debug!("content: merged chapters={} words={}", count, words.len());
    Ok(words)
}
