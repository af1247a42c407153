//! Per-word display duration.

use crate::pipeline::Word;

const LONG_WORD_CHARS: usize = 8;
const MEDIUM_WORD_CHARS: usize = 5;
const LONG_WORD_FACTOR: f32 = 1.3;
const MEDIUM_WORD_FACTOR: f32 = 1.15;
/// Share of the full punctuation pause given to `,;:`.
const CLAUSE_PAUSE_SHARE: f32 = 0.6;

/// Display time for `word` in milliseconds.
///
/// The natural pause multiplier is always applied; the punctuation bonus only
/// when `pause_on_punctuation` is set, with end punctuation taking precedence
/// over clause punctuation.
pub fn word_delay_ms(
    word: &Word,
    wpm: u16,
    pause_on_punctuation: bool,
    punctuation_multiplier: f32,
) -> f32 {
    let base = 60_000.0 / f32::from(wpm.max(1));

    let length = match word.clean_text.chars().count() {
        0 => word.text.chars().count(),
        n => n,
    };
    let length_factor = if length > LONG_WORD_CHARS {
        LONG_WORD_FACTOR
    } else if length > MEDIUM_WORD_CHARS {
        MEDIUM_WORD_FACTOR
    } else {
        1.0
    };

    let delay = base * length_factor * word.pause_multiplier;
    if !pause_on_punctuation {
        return delay;
    }

    if word.has_end_punctuation {
        delay * punctuation_multiplier
    } else if word.has_pause_punctuation {
        delay * (1.0 + (punctuation_multiplier - 1.0) * CLAUSE_PAUSE_SHARE)
    } else {
        delay
    }
}

/// Rounds a delay to whole milliseconds for the scheduler; never zero.
pub fn schedule_delay_ms(delay: f32) -> u32 {
    if delay.is_nan() || delay < 1.0 {
        return 1;
    }
    (delay + 0.5) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::process_text;

    fn word(text: &str) -> Word {
        let mut words = process_text(&alloc::format!("lead {text}"), 0);
        words.remove(1)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn base_delay_is_one_minute_over_wpm() {
        assert!(close(word_delay_ms(&word("cat"), 250, true, 2.5), 240.0));
        assert!(close(word_delay_ms(&word("cat"), 600, true, 2.5), 100.0));
    }

    #[test]
    fn longer_words_stay_longer() {
        assert!(close(word_delay_ms(&word("planet"), 250, false, 2.5), 276.0));
        assert!(close(word_delay_ms(&word("wonderful"), 250, false, 2.5), 312.0));
    }

    #[test]
    fn letterless_words_fall_back_to_raw_length() {
        // Seven digits: medium band, plus the 1.15 numeric pause.
        let number = word("1234567");
        assert!(number.clean_text.is_empty());
        assert!(close(
            word_delay_ms(&number, 250, false, 2.5),
            240.0 * 1.15 * 1.15
        ));
    }

    #[test]
    fn punctuation_bonus_follows_the_toggle() {
        let end = word("done.");
        let clause = word("then,");
        assert!(close(word_delay_ms(&end, 250, true, 2.5), 600.0));
        assert!(close(word_delay_ms(&clause, 250, true, 2.5), 240.0 * 1.9));
        assert!(close(word_delay_ms(&end, 250, false, 2.5), 240.0));
        assert!(close(word_delay_ms(&clause, 250, false, 2.5), 240.0));
    }

    #[test]
    fn end_punctuation_wins_over_clause_punctuation() {
        let mut both = word("done.");
        both.has_pause_punctuation = true;
        assert!(close(word_delay_ms(&both, 250, true, 2.5), 600.0));
    }

    #[test]
    fn natural_pause_applies_without_punctuation_pausing() {
        let mut header = word("cat");
        header.pause_multiplier = 1.5;
        assert!(close(word_delay_ms(&header, 250, false, 2.5), 360.0));
    }

    #[test]
    fn delay_strictly_decreases_with_speed() {
        let sample = word("extraordinary,");
        let mut previous = f32::MAX;
        for wpm in (100..=800).step_by(25) {
            let delay = word_delay_ms(&sample, wpm, true, 2.5);
            assert!(delay < previous, "delay did not drop at {wpm} wpm");
            previous = delay;
        }
    }

    #[test]
    fn schedule_delay_rounds_and_floors_at_one() {
        assert_eq!(schedule_delay_ms(239.6), 240);
        assert_eq!(schedule_delay_ms(240.4), 240);
        assert_eq!(schedule_delay_ms(0.0), 1);
        assert_eq!(schedule_delay_ms(f32::NAN), 1);
    }
}
