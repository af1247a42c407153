//! Playback state machine: a self-rescheduling word clock with transport
//! controls and sentence navigation.
//!
//! The engine owns a single [`TimerSlot`]. Every tick computes the delay of
//! the word it just revealed from the live speed and preferences and re-arms
//! the slot, so a speed change lands on the very next word. The host loop
//! drives time by calling [`PlaybackEngine::poll`].

use alloc::vec::Vec;

use log::debug;

use crate::{
    input::ReaderIntent,
    orp::{OrpSplit, split_word_by_orp},
    pipeline::Word,
    render::{ContextPreview, ReaderView},
    settings::{MAX_WPM, MIN_WPM, ReaderPreferences},
    timer::TimerSlot,
    timing::{schedule_delay_ms, word_delay_ms},
};

pub const JUMP_WORDS: usize = 10;
pub const WPM_STEP: u16 = 25;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlaybackConfig {
    pub jump_words: usize,
    pub min_wpm: u16,
    pub max_wpm: u16,
    pub wpm_step: u16,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            jump_words: JUMP_WORDS,
            min_wpm: MIN_WPM,
            max_wpm: MAX_WPM,
            wpm_step: WPM_STEP,
        }
    }
}

/// Inclusive word range of one sentence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SentenceBounds {
    pub start: usize,
    pub end: usize,
}

/// Receives the engine's side effects.
pub trait PlaybackObserver {
    /// Called after every index mutation with the new index.
    fn on_position_change(&mut self, _index: usize) {}

    /// Called once when playback runs past the last word.
    fn on_complete(&mut self) {}
}

impl PlaybackObserver for () {}

pub struct PlaybackEngine<O = ()>
where
    O: PlaybackObserver,
{
    words: Vec<Word>,
    index: usize,
    state: PlaybackState,
    wpm: u16,
    pause_on_punctuation: bool,
    punctuation_multiplier: f32,
    config: PlaybackConfig,
    timer: TimerSlot,
    observer: O,
}

impl<O> PlaybackEngine<O>
where
    O: PlaybackObserver,
{
    pub fn new(
        words: Vec<Word>,
        initial_index: usize,
        preferences: &ReaderPreferences,
        observer: O,
    ) -> Self {
        Self::with_config(
            words,
            initial_index,
            preferences,
            observer,
            PlaybackConfig::default(),
        )
    }

    pub fn with_config(
        words: Vec<Word>,
        initial_index: usize,
        preferences: &ReaderPreferences,
        observer: O,
        config: PlaybackConfig,
    ) -> Self {
        let mut engine = Self {
            words,
            index: 0,
            state: PlaybackState::Idle,
            wpm: preferences.wpm(),
            pause_on_punctuation: preferences.pause_on_punctuation,
            punctuation_multiplier: preferences.punctuation_pause_multiplier,
            config,
            timer: TimerSlot::new(),
            observer,
        };
        engine.index = engine.clamp_index(initial_index);
        engine.set_wpm(preferences.wpm());
        engine
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.words.get(self.index)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn wpm(&self) -> u16 {
        self.wpm
    }

    pub fn config(&self) -> PlaybackConfig {
        self.config
    }

    /// Deadline of the pending advance, if one is scheduled.
    pub fn next_tick_ms(&self) -> Option<u64> {
        self.timer.deadline_ms()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn last_index(&self) -> usize {
        self.words.len().saturating_sub(1)
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.last_index())
    }

    fn move_to(&mut self, index: usize) {
        self.index = index;
        self.observer.on_position_change(index);
    }

    fn current_delay_ms(&self) -> u32 {
        self.current_word().map_or(1, |word| {
            schedule_delay_ms(word_delay_ms(
                word,
                self.wpm,
                self.pause_on_punctuation,
                self.punctuation_multiplier,
            ))
        })
    }
}

include!("runtime.rs");
include!("navigation.rs");
include!("view.rs");

#[cfg(test)]
mod tests;
