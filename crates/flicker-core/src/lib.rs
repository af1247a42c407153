#![cfg_attr(not(test), no_std)]

//! Text-to-timed-sequence pipeline and playback engine for RSVP reading.

extern crate alloc;

pub mod content;
pub mod input;
pub mod orp;
pub mod pipeline;
pub mod playback;
pub mod render;
pub mod settings;
pub mod text;
pub mod text_policy;
pub mod timer;
pub mod timing;
pub mod tracker;

pub use pipeline::Word;
pub use playback::{PlaybackEngine, PlaybackObserver, PlaybackState};
pub use settings::{ReaderPreferences, ReadingPosition, Theme};
pub use tracker::PositionTracker;
