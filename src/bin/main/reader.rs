use flicker_core::{
    PlaybackEngine, PlaybackObserver, PositionTracker, ReaderPreferences, ReadingPosition, Word,
    content::{ChapterSource, StaticChapterSource, book_words, chapter_words},
    input::InputEvent,
    playback::TickResult,
    render::{ContextPreview, ReaderView},
    settings::PositionStore,
};
use log::info;

/// Collects engine side effects until the reader drains them.
#[derive(Debug, Default)]
pub(super) struct ProgressRelay {
    moved_to: Option<usize>,
    completed: bool,
}

impl PlaybackObserver for ProgressRelay {
    fn on_position_change(&mut self, index: usize) {
        self.moved_to = Some(index);
    }

    fn on_complete(&mut self) {
        self.completed = true;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Flow {
    Idle,
    Render,
    Quit,
}

/// One open text: the playback engine, the chapters it reads from and the
/// tracker that remembers where the reader is. Quick reads run without a
/// tracker.
pub(super) struct Reader<S>
where
    S: PositionStore,
{
    source: StaticChapterSource,
    engine: PlaybackEngine<ProgressRelay>,
    tracker: Option<PositionTracker<S>>,
    continuous: bool,
    chapter: usize,
    /// First merged index of `chapter` when reading continuously.
    chapter_start: usize,
    resume_offer: Option<ReadingPosition>,
    finished: bool,
}

impl<S> Reader<S>
where
    S: PositionStore,
{
    pub(super) fn open(
        mut source: StaticChapterSource,
        continuous: bool,
        preferences: &ReaderPreferences,
        mut tracker: Option<PositionTracker<S>>,
        now_ms: u64,
    ) -> Self {
        let words = if continuous {
            let Ok(words) = book_words(&mut source);
            words
        } else {
            Vec::new()
        };

        let saved = tracker.as_mut().and_then(PositionTracker::load_position);
        let mut reader = Self {
            source,
            engine: PlaybackEngine::new(words, 0, preferences, ProgressRelay::default()),
            tracker,
            continuous,
            chapter: 0,
            chapter_start: 0,
            resume_offer: None,
            finished: false,
        };

        match saved {
            Some(position) => {
                info!(
                    "reader: resuming chapter={} word={}",
                    position.chapter_index, position.word_index
                );
                reader.load_at(position.chapter_index, position.word_index, now_ms);
                if position.should_offer_resume(now_ms) {
                    reader.resume_offer = Some(position);
                }
            }
            None => reader.load_at(0, 0, now_ms),
        }

        reader
    }

    pub(super) fn engine(&self) -> &PlaybackEngine<ProgressRelay> {
        &self.engine
    }

    pub(super) fn view(&self) -> ReaderView<'_> {
        self.engine.view()
    }

    pub(super) fn context_preview(&self) -> Option<ContextPreview<'_>> {
        self.engine.context_preview()
    }

    pub(super) fn chapter(&self) -> usize {
        self.chapter
    }

    pub(super) fn chapter_count(&self) -> usize {
        self.source.chapter_count()
    }

    pub(super) fn chapter_title(&self) -> Option<&str> {
        self.source.chapter_title(self.chapter)
    }

    pub(super) fn resume_offer(&self) -> Option<&ReadingPosition> {
        self.resume_offer.as_ref()
    }

    pub(super) fn is_finished(&self) -> bool {
        self.finished
    }

    #[cfg(test)]
    fn tracker(&self) -> Option<&PositionTracker<S>> {
        self.tracker.as_ref()
    }

    /// Earliest deadline the host loop has to wake up for.
    pub(super) fn next_deadline_ms(&self) -> Option<u64> {
        let tracker = self
            .tracker
            .as_ref()
            .and_then(PositionTracker::debounce_deadline_ms);
        match (self.engine.next_tick_ms(), tracker) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub(super) fn handle_event(&mut self, event: InputEvent, now_ms: u64) -> Flow {
        match event {
            InputEvent::Quit => Flow::Quit,
            InputEvent::Hidden => {
                if let Some(tracker) = self.tracker.as_mut() {
                    tracker.on_visibility_hidden(now_ms);
                }
                Flow::Idle
            }
            InputEvent::Confirm | InputEvent::Dismiss => match self.resume_offer.take() {
                Some(_) => Flow::Render,
                None => Flow::Idle,
            },
            InputEvent::PreviousChapter => {
                self.resume_offer = None;
                match self.chapter.checked_sub(1) {
                    Some(previous) => self.go_to_chapter(previous, now_ms),
                    None => Flow::Idle,
                }
            }
            InputEvent::NextChapter => {
                self.resume_offer = None;
                self.go_to_chapter(self.chapter + 1, now_ms)
            }
            InputEvent::Intent(intent) => {
                self.resume_offer = None;
                self.finished = false;
                let result = self.engine.handle_intent(intent, now_ms);
                self.drain_progress(now_ms);
                match result {
                    TickResult::RenderRequested => Flow::Render,
                    TickResult::NoRender => Flow::Idle,
                }
            }
        }
    }

    pub(super) fn poll(&mut self, now_ms: u64) -> Flow {
        let flow = match self.engine.poll(now_ms) {
            TickResult::RenderRequested => Flow::Render,
            TickResult::NoRender => Flow::Idle,
        };
        self.drain_progress(now_ms);

        if let Some(tracker) = self.tracker.as_mut() {
            tracker.poll(now_ms);
        }
        flow
    }

    pub(super) fn shutdown(&mut self, now_ms: u64) {
        self.engine.shutdown();
        self.drain_progress(now_ms);
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.on_teardown(now_ms);
        }
    }

    /// Opens `chapter` at its first word, paused. Chapters past either end
    /// are ignored.
    fn go_to_chapter(&mut self, chapter: usize, now_ms: u64) -> Flow {
        if chapter == self.chapter || !self.source.has_chapter(chapter) {
            return Flow::Idle;
        }

        info!("reader: chapter={chapter}");
        self.finished = false;
        self.engine.pause();
        self.load_at(chapter, 0, now_ms);
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.save_position(0, now_ms);
        }
        Flow::Render
    }

    /// Shows `chapter` at `word_index`. Out-of-range chapters fall back to
    /// the start of the text.
    fn load_at(&mut self, chapter: usize, word_index: usize, now_ms: u64) {
        let (chapter, word_index) = if self.source.has_chapter(chapter) {
            (chapter, word_index)
        } else {
            (0, 0)
        };

        if self.continuous {
            self.chapter_start = chapter_offset(self.engine.words(), chapter);
            let target = self.chapter_start.saturating_add(word_index);
            self.engine.go_to_word(target);
            self.engine.observer_mut().moved_to = None;
        } else {
            let Ok(words) = chapter_words(&mut self.source, chapter);
            self.engine.load_words(words, word_index);
        }

        self.chapter = chapter;
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.set_chapter(chapter, now_ms);
        }
    }

    fn drain_progress(&mut self, now_ms: u64) {
        let relay = self.engine.observer_mut();
        let moved_to = relay.moved_to.take();
        let completed = core::mem::take(&mut relay.completed);

        if let Some(index) = moved_to {
            self.track_index(index, now_ms);
        }
        if completed {
            self.complete_chapter(now_ms);
        }
    }

    fn track_index(&mut self, index: usize, now_ms: u64) {
        if self.continuous {
            let chapter = self
                .engine
                .words()
                .get(index)
                .map_or(self.chapter, |word| word.chapter_index);
            if chapter != self.chapter {
                self.chapter = chapter;
                self.chapter_start = chapter_offset(self.engine.words(), chapter);
                if let Some(tracker) = self.tracker.as_mut() {
                    tracker.set_chapter(chapter, now_ms);
                }
            }
        }

        let local = index.saturating_sub(self.chapter_start);
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.save_position(local, now_ms);
        }
    }

    fn complete_chapter(&mut self, now_ms: u64) {
        let next = self.chapter + 1;
        if self.continuous || !self.source.has_chapter(next) {
            info!("reader: finished at chapter={}", self.chapter);
            self.finished = true;
            if let Some(tracker) = self.tracker.as_mut() {
                tracker.flush_save(now_ms);
            }
            return;
        }

        info!("reader: advancing to chapter={next}");
        self.load_at(next, 0, now_ms);
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.save_position(0, now_ms);
        }
        self.engine.play(now_ms);
    }
}

fn chapter_offset(words: &[Word], chapter: usize) -> usize {
    words
        .iter()
        .position(|word| word.chapter_index == chapter)
        .unwrap_or(0)
}
