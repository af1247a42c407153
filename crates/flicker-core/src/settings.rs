//! Persisted reader preferences and reading position, plus the storage
//! traits the host implements for them.

use alloc::string::String;

pub const MIN_WPM: u16 = 100;
pub const MAX_WPM: u16 = 800;
pub const DEFAULT_WPM: u16 = 250;
pub const DEFAULT_PUNCTUATION_MULTIPLIER: f32 = 2.5;
/// A saved position younger than this resumes silently.
pub const RESUME_PROMPT_AFTER_MS: u64 = 60_000;

pub fn clamp_wpm(wpm: u16) -> u16 {
    wpm.clamp(MIN_WPM, MAX_WPM)
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// User-tunable settings that should survive restarts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReaderPreferences {
    wpm: u16,
    pub theme: Theme,
    pub pause_on_punctuation: bool,
    pub punctuation_pause_multiplier: f32,
}

impl Default for ReaderPreferences {
    fn default() -> Self {
        Self {
            wpm: DEFAULT_WPM,
            theme: Theme::System,
            pause_on_punctuation: true,
            punctuation_pause_multiplier: DEFAULT_PUNCTUATION_MULTIPLIER,
        }
    }
}

impl ReaderPreferences {
    pub fn new(
        wpm: u16,
        theme: Theme,
        pause_on_punctuation: bool,
        punctuation_pause_multiplier: f32,
    ) -> Self {
        Self {
            wpm: clamp_wpm(wpm),
            theme,
            pause_on_punctuation,
            punctuation_pause_multiplier,
        }
    }

    pub fn wpm(&self) -> u16 {
        self.wpm
    }

    /// Clamps into `[MIN_WPM, MAX_WPM]`; returns whether the value changed.
    pub fn set_wpm(&mut self, wpm: u16) -> bool {
        let next = clamp_wpm(wpm);
        let changed = next != self.wpm;
        self.wpm = next;
        changed
    }

    pub fn with_wpm(mut self, wpm: u16) -> Self {
        self.set_wpm(wpm);
        self
    }
}

/// Last reading location for one book; one record per book, overwritten.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReadingPosition {
    pub book_id: String,
    pub chapter_index: usize,
    pub word_index: usize,
    /// Epoch milliseconds of the save.
    pub timestamp_ms: u64,
}

impl ReadingPosition {
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp_ms)
    }

    /// Whether reopening the book should offer an explicit "continue" prompt.
    pub fn should_offer_resume(&self, now_ms: u64) -> bool {
        self.age_ms(now_ms) > RESUME_PROMPT_AFTER_MS
    }
}

/// Persistence collaborator for reading positions.
pub trait PositionStore {
    type Error;

    fn get(&mut self, book_id: &str) -> Result<Option<ReadingPosition>, Self::Error>;
    fn put(&mut self, position: &ReadingPosition) -> Result<(), Self::Error>;
    fn delete(&mut self, book_id: &str) -> Result<(), Self::Error>;

    /// Fire-and-forget save used while the process is going away.
    fn put_best_effort(&mut self, position: &ReadingPosition) {
        let _ = self.put(position);
    }
}

/// Abstract preferences persistence backend.
pub trait PreferencesStore {
    type Error;

    fn load(&mut self) -> Result<Option<ReaderPreferences>, Self::Error>;
    fn save(&mut self, preferences: &ReaderPreferences) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reader_baseline() {
        let prefs = ReaderPreferences::default();
        assert_eq!(prefs.wpm(), 250);
        assert_eq!(prefs.theme, Theme::System);
        assert!(prefs.pause_on_punctuation);
        assert_eq!(prefs.punctuation_pause_multiplier, 2.5);
    }

    #[test]
    fn wpm_is_clamped_on_every_change() {
        let mut prefs = ReaderPreferences::default();
        assert!(prefs.set_wpm(20));
        assert_eq!(prefs.wpm(), MIN_WPM);
        assert!(prefs.set_wpm(5_000));
        assert_eq!(prefs.wpm(), MAX_WPM);
        assert!(!prefs.set_wpm(900));
        assert_eq!(ReaderPreferences::default().with_wpm(420).wpm(), 420);
        assert_eq!(ReaderPreferences::new(40, Theme::Dark, false, 2.0).wpm(), MIN_WPM);
    }

    #[test]
    fn resume_prompt_needs_a_minute_of_age() {
        let position = ReadingPosition {
            book_id: String::from("book"),
            chapter_index: 0,
            word_index: 12,
            timestamp_ms: 1_000_000,
        };
        assert!(!position.should_offer_resume(1_000_000 + 30_000));
        assert!(position.should_offer_resume(1_000_000 + 90_000));
        assert!(!position.should_offer_resume(0));
    }

    #[test]
    fn theme_names_round_trip() {
        for theme in [Theme::Light, Theme::Dark, Theme::System] {
            assert_eq!(Theme::parse(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::parse("sepia"), None);
    }
}
