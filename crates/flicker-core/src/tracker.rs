//! Debounced persistence of the reading position.
//!
//! Position changes are coalesced behind a short debounce. A jump of many
//! words forward saves at once, and the host flushes on visibility loss and
//! on teardown. Store failures never reach the reading flow: the pending
//! index stays put and the next trigger retries.

use alloc::string::String;

use log::{debug, warn};

use crate::{
    settings::{PositionStore, ReadingPosition},
    timer::TimerSlot,
};

pub const SAVE_DEBOUNCE_MS: u32 = 1_000;
pub const SAVE_EVERY_WORDS: usize = 50;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TrackerConfig {
    pub debounce_ms: u32,
    /// Forward distance from the last save that forces an immediate save.
    pub save_every_words: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: SAVE_DEBOUNCE_MS,
            save_every_words: SAVE_EVERY_WORDS,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlushOutcome {
    NothingPending,
    Saved,
    Failed,
}

pub struct PositionTracker<S>
where
    S: PositionStore,
{
    book_id: String,
    chapter_index: usize,
    store: S,
    config: TrackerConfig,
    pending: Option<usize>,
    last_saved: usize,
    debounce: TimerSlot,
}

impl<S> PositionTracker<S>
where
    S: PositionStore,
{
    pub fn new(book_id: impl Into<String>, chapter_index: usize, store: S) -> Self {
        Self::with_config(book_id, chapter_index, store, TrackerConfig::default())
    }

    pub fn with_config(
        book_id: impl Into<String>,
        chapter_index: usize,
        store: S,
        config: TrackerConfig,
    ) -> Self {
        Self {
            book_id: book_id.into(),
            chapter_index,
            store,
            config,
            pending: None,
            last_saved: 0,
            debounce: TimerSlot::new(),
        }
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    pub fn chapter_index(&self) -> usize {
        self.chapter_index
    }

    pub fn pending(&self) -> Option<usize> {
        self.pending
    }

    pub fn last_saved(&self) -> usize {
        self.last_saved
    }

    pub fn debounce_deadline_ms(&self) -> Option<u64> {
        self.debounce.deadline_ms()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Records a new index, saving immediately after a long forward run and
    /// otherwise restarting the debounce.
    pub fn save_position(&mut self, word_index: usize, now_ms: u64) {
        self.pending = Some(word_index);

        if word_index.saturating_sub(self.last_saved) >= self.config.save_every_words {
            self.debounce.cancel();
            self.flush_save(now_ms);
            return;
        }

        self.debounce.arm(now_ms, self.config.debounce_ms);
    }

    /// Saves once the debounce has expired.
    pub fn poll(&mut self, now_ms: u64) -> FlushOutcome {
        if self.debounce.take_due(now_ms) {
            self.flush_save(now_ms)
        } else {
            FlushOutcome::NothingPending
        }
    }

    pub fn flush_save(&mut self, now_ms: u64) -> FlushOutcome {
        let Some(word_index) = self.pending else {
            return FlushOutcome::NothingPending;
        };

        let position = self.record(word_index, now_ms);
        match self.store.put(&position) {
            Ok(()) => {
                self.last_saved = word_index;
                self.pending = None;
                debug!(
                    "tracker: saved book={} chapter={} word={}",
                    self.book_id, self.chapter_index, word_index
                );
                FlushOutcome::Saved
            }
            Err(_) => {
                // Keep the pending index; the next trigger retries.
                warn!(
                    "tracker: save failed book={} chapter={} word={}",
                    self.book_id, self.chapter_index, word_index
                );
                FlushOutcome::Failed
            }
        }
    }

    /// The reading surface went out of view.
    pub fn on_visibility_hidden(&mut self, now_ms: u64) -> FlushOutcome {
        self.flush_save(now_ms)
    }

    /// The process is going away: hand the pending index to the store's
    /// fire-and-forget path without waiting on the outcome.
    pub fn on_teardown(&mut self, now_ms: u64) {
        self.debounce.cancel();
        let Some(word_index) = self.pending.take() else {
            return;
        };

        let position = self.record(word_index, now_ms);
        self.store.put_best_effort(&position);
        self.last_saved = word_index;
        debug!(
            "tracker: teardown save book={} chapter={} word={}",
            self.book_id, self.chapter_index, word_index
        );
    }

    /// Fetches the saved position, adopts its chapter and seeds the save
    /// distance from its word index.
    pub fn load_position(&mut self) -> Option<ReadingPosition> {
        match self.store.get(&self.book_id) {
            Ok(Some(position)) => {
                self.chapter_index = position.chapter_index;
                self.last_saved = position.word_index;
                Some(position)
            }
            Ok(None) => None,
            Err(_) => {
                warn!("tracker: load failed book={}", self.book_id);
                None
            }
        }
    }

    pub fn clear_position(&mut self) -> bool {
        self.debounce.cancel();
        self.pending = None;
        self.last_saved = 0;
        self.store.delete(&self.book_id).is_ok()
    }

    /// Flushes whatever is pending for the old chapter, then follows the
    /// reader into `chapter_index`.
    pub fn set_chapter(&mut self, chapter_index: usize, now_ms: u64) {
        if chapter_index == self.chapter_index {
            return;
        }

        self.debounce.cancel();
        self.flush_save(now_ms);
        self.pending = None;
        self.chapter_index = chapter_index;
        self.last_saved = 0;
    }

    fn record(&self, word_index: usize, now_ms: u64) -> ReadingPosition {
        ReadingPosition {
            book_id: self.book_id.clone(),
            chapter_index: self.chapter_index,
            word_index,
            timestamp_ms: now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[derive(Debug, Default)]
    struct MemoryStore {
        saved: Option<ReadingPosition>,
        puts: Vec<ReadingPosition>,
        best_effort: usize,
        fail: bool,
    }

    impl PositionStore for MemoryStore {
        type Error = ();

        fn get(&mut self, book_id: &str) -> Result<Option<ReadingPosition>, ()> {
            if self.fail {
                return Err(());
            }
            Ok(self.saved.clone().filter(|p| p.book_id == book_id))
        }

        fn put(&mut self, position: &ReadingPosition) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.saved = Some(position.clone());
            self.puts.push(position.clone());
            Ok(())
        }

        fn delete(&mut self, _book_id: &str) -> Result<(), ()> {
            self.saved = None;
            Ok(())
        }

        fn put_best_effort(&mut self, position: &ReadingPosition) {
            self.best_effort += 1;
            let _ = self.put(position);
        }
    }

    fn tracker() -> PositionTracker<MemoryStore> {
        PositionTracker::new("book-1", 2, MemoryStore::default())
    }

    #[test]
    fn rapid_saves_collapse_into_one_record() {
        let mut tracker = tracker();
        for (step, index) in (1..=5).enumerate() {
            tracker.save_position(index, step as u64 * 100);
        }
        assert!(tracker.store().puts.is_empty());

        assert_eq!(tracker.poll(1_399), FlushOutcome::NothingPending);
        assert_eq!(tracker.poll(1_400), FlushOutcome::Saved);

        let puts = &tracker.store().puts;
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].word_index, 5);
        assert_eq!(puts[0].chapter_index, 2);
        assert_eq!(puts[0].book_id, "book-1");
        assert_eq!(puts[0].timestamp_ms, 1_400);
        assert_eq!(tracker.pending(), None);
    }

    #[test]
    fn long_forward_run_saves_immediately() {
        let mut tracker = tracker();
        tracker.save_position(49, 0);
        assert!(tracker.store().puts.is_empty());
        tracker.save_position(50, 10);
        assert_eq!(tracker.store().puts.len(), 1);
        assert_eq!(tracker.last_saved(), 50);
        assert_eq!(tracker.debounce_deadline_ms(), None);

        // Distance counts from the last save, not from zero.
        tracker.save_position(80, 20);
        assert_eq!(tracker.store().puts.len(), 1);
        tracker.save_position(100, 30);
        assert_eq!(tracker.store().puts.len(), 2);
    }

    #[test]
    fn backward_moves_only_debounce() {
        let mut tracker = tracker();
        tracker.save_position(200, 0);
        tracker.save_position(10, 5);
        assert_eq!(tracker.store().puts.len(), 1);
        assert_eq!(tracker.debounce_deadline_ms(), Some(1_005));
    }

    #[test]
    fn flush_is_idempotent() {
        let mut tracker = tracker();
        assert_eq!(tracker.flush_save(0), FlushOutcome::NothingPending);
        tracker.save_position(3, 0);
        assert_eq!(tracker.flush_save(1), FlushOutcome::Saved);
        assert_eq!(tracker.flush_save(2), FlushOutcome::NothingPending);
        assert_eq!(tracker.store().puts.len(), 1);
    }

    #[test]
    fn failed_save_keeps_the_pending_index() {
        let mut tracker = tracker();
        tracker.store_mut().fail = true;
        tracker.save_position(7, 0);
        assert_eq!(tracker.poll(1_000), FlushOutcome::Failed);
        assert_eq!(tracker.pending(), Some(7));

        tracker.store_mut().fail = false;
        assert_eq!(tracker.on_visibility_hidden(2_000), FlushOutcome::Saved);
        assert_eq!(tracker.store().saved.as_ref().map(|p| p.word_index), Some(7));
    }

    #[test]
    fn teardown_uses_the_best_effort_path() {
        let mut tracker = tracker();
        tracker.save_position(9, 0);
        tracker.on_teardown(50);
        assert_eq!(tracker.store().best_effort, 1);
        assert_eq!(tracker.pending(), None);
        assert_eq!(tracker.debounce_deadline_ms(), None);

        tracker.on_teardown(60);
        assert_eq!(tracker.store().best_effort, 1);
    }

    #[test]
    fn load_seeds_the_save_distance() {
        let mut tracker = tracker();
        tracker.store_mut().saved = Some(ReadingPosition {
            book_id: String::from("book-1"),
            chapter_index: 2,
            word_index: 400,
            timestamp_ms: 0,
        });

        assert_eq!(tracker.load_position().map(|p| p.word_index), Some(400));
        tracker.save_position(420, 0);
        assert!(tracker.store().puts.is_empty());
        tracker.save_position(450, 0);
        assert_eq!(tracker.store().puts.len(), 1);
    }

    #[test]
    fn load_adopts_the_saved_chapter() {
        let mut tracker = tracker();
        tracker.store_mut().saved = Some(ReadingPosition {
            book_id: String::from("book-1"),
            chapter_index: 5,
            word_index: 400,
            timestamp_ms: 0,
        });

        tracker.load_position();
        assert_eq!(tracker.chapter_index(), 5);

        // Following the reader into the loaded chapter keeps the seed.
        tracker.set_chapter(5, 10);
        assert_eq!(tracker.last_saved(), 400);
        tracker.save_position(410, 20);
        assert!(tracker.store().puts.is_empty());
        assert_eq!(tracker.debounce_deadline_ms(), Some(1_020));
    }

    #[test]
    fn load_failure_reads_as_no_position() {
        let mut tracker = tracker();
        tracker.store_mut().fail = true;
        assert_eq!(tracker.load_position(), None);
        assert_eq!(tracker.last_saved(), 0);
    }

    #[test]
    fn chapter_change_flushes_the_old_chapter() {
        let mut tracker = tracker();
        tracker.save_position(12, 0);
        tracker.set_chapter(3, 100);

        let saved = tracker.store().saved.clone().unwrap();
        assert_eq!((saved.chapter_index, saved.word_index), (2, 12));
        assert_eq!(tracker.chapter_index(), 3);
        assert_eq!(tracker.last_saved(), 0);
        assert_eq!(tracker.debounce_deadline_ms(), None);
    }

    #[test]
    fn clearing_drops_pending_and_record() {
        let mut tracker = tracker();
        tracker.save_position(60, 0);
        tracker.save_position(61, 1);
        assert!(tracker.clear_position());
        assert_eq!(tracker.pending(), None);
        assert!(tracker.store().saved.is_none());
        assert_eq!(tracker.poll(u64::MAX), FlushOutcome::NothingPending);
    }
}
