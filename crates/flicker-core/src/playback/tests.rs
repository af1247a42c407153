use alloc::vec::Vec;

use super::*;
use crate::pipeline::process_text;

#[derive(Debug, Default)]
struct Recorder {
    positions: Vec<usize>,
    completions: usize,
}

impl PlaybackObserver for Recorder {
    fn on_position_change(&mut self, index: usize) {
        self.positions.push(index);
    }

    fn on_complete(&mut self) {
        self.completions += 1;
    }
}

fn engine(text: &str) -> PlaybackEngine<Recorder> {
    PlaybackEngine::new(
        process_text(text, 0),
        0,
        &ReaderPreferences::default(),
        Recorder::default(),
    )
}

/// Fires every scheduled advance at its exact deadline; returns the number
/// of fires.
fn run_to_end(engine: &mut PlaybackEngine<Recorder>) -> usize {
    let mut fires = 0usize;
    while let Some(deadline) = engine.next_tick_ms() {
        engine.poll(deadline);
        fires += 1;
        assert!(fires < 10_000, "playback never finished");
    }
    fires
}

const SENTENCES: &str = "Hello world. Next sentence! Final";

#[test]
fn playing_n_words_advances_n_minus_one_times_then_completes_once() {
    let mut engine = engine("one two six ten red");
    engine.play(0);
    assert_eq!(engine.state(), PlaybackState::Playing);

    let fires = run_to_end(&mut engine);

    assert_eq!(fires, 5);
    assert_eq!(engine.observer().positions, [1, 2, 3, 4]);
    assert_eq!(engine.observer().completions, 1);
    assert_eq!(engine.state(), PlaybackState::Idle);
    assert_eq!(engine.current_index(), 4);
    assert_eq!(engine.next_tick_ms(), None);
}

#[test]
fn single_word_completes_after_its_own_delay() {
    let mut engine = engine("Alone");
    engine.play(0);
    assert_eq!(run_to_end(&mut engine), 1);
    assert!(engine.observer().positions.is_empty());
    assert_eq!(engine.observer().completions, 1);
}

#[test]
fn play_from_last_word_restarts_at_zero() {
    let mut engine = engine("one two six");
    engine.go_to_word(99);
    assert_eq!(engine.current_index(), 2);

    engine.play(0);
    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.observer().positions, [2, 0]);
    assert!(engine.is_playing());
}

#[test]
fn first_delay_belongs_to_the_current_word() {
    let mut engine = engine("one two six ten red");
    engine.play(1_000);
    // Chapter opening pause: 240 ms * 1.5.
    assert_eq!(engine.next_tick_ms(), Some(1_360));
    assert_eq!(engine.poll(1_359), TickResult::NoRender);
    assert_eq!(engine.poll(1_360), TickResult::RenderRequested);
    assert_eq!(engine.current_index(), 1);
    assert_eq!(engine.next_tick_ms(), Some(1_600));
}

#[test]
fn speed_change_lands_on_the_next_word() {
    let mut engine = engine("one two six ten red");
    engine.play(0);
    engine.poll(360);
    assert_eq!(engine.next_tick_ms(), Some(600));

    assert_eq!(engine.set_wpm(500), 500);
    // The pending deadline is left alone.
    assert_eq!(engine.next_tick_ms(), Some(600));
    engine.poll(600);
    assert_eq!(engine.next_tick_ms(), Some(720));
}

#[test]
fn pause_cancels_the_pending_advance() {
    let mut engine = engine("one two six ten red");
    engine.play(0);
    engine.pause();

    assert_eq!(engine.state(), PlaybackState::Paused);
    assert_eq!(engine.next_tick_ms(), None);
    assert_eq!(engine.poll(u64::MAX), TickResult::NoRender);
    assert_eq!(engine.current_index(), 0);
}

#[test]
fn stale_tick_after_pause_or_stop_is_ignored() {
    let mut engine = engine("one two six ten red");
    engine.play(0);
    engine.pause();
    assert_eq!(engine.tick(10_000), TickResult::NoRender);
    assert_eq!(engine.current_index(), 0);

    engine.play(0);
    engine.stop();
    assert_eq!(engine.tick(10_000), TickResult::NoRender);
    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.observer().completions, 0);
}

#[test]
fn play_while_playing_keeps_one_deadline() {
    let mut engine = engine("one two six ten red");
    engine.play(0);
    engine.play(5_000);
    assert_eq!(engine.next_tick_ms(), Some(360));
}

#[test]
fn toggle_switches_between_play_and_pause() {
    let mut engine = engine("one two six");
    engine.toggle(0);
    assert!(engine.is_playing());
    engine.toggle(10);
    assert_eq!(engine.state(), PlaybackState::Paused);
    engine.toggle(20);
    assert!(engine.is_playing());
    assert_eq!(engine.next_tick_ms(), Some(380));
}

#[test]
fn stop_resets_to_zero_and_notifies() {
    let mut engine = engine("one two six ten red");
    engine.go_to_word(3);
    engine.play(0);
    engine.stop();

    assert_eq!(engine.state(), PlaybackState::Idle);
    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.observer().positions, [3, 0]);
    assert_eq!(engine.next_tick_ms(), None);
}

#[test]
fn jumps_clamp_to_the_sequence() {
    let text = "w0 w1 w2 w3 w4 w5 w6 w7 w8 w9 w10 w11 w12 w13 w14";
    let mut engine = engine(text);
    engine.go_to_word(3);
    engine.jump_back();
    assert_eq!(engine.current_index(), 0);

    engine.go_to_word(12);
    engine.jump_forward();
    assert_eq!(engine.current_index(), 14);

    engine.go_to_word(2);
    engine.jump_forward();
    assert_eq!(engine.current_index(), 12);
    assert_eq!(engine.observer().positions, [3, 0, 12, 14, 2, 12]);
}

#[test]
fn jumps_leave_playback_running() {
    let mut engine = engine("one two six ten red one two six ten red one two");
    engine.play(0);
    engine.jump_forward();
    assert!(engine.is_playing());
    assert_eq!(engine.next_tick_ms(), Some(360));

    engine.poll(360);
    assert_eq!(engine.current_index(), 11);
}

#[test]
fn next_sentence_lands_after_end_punctuation() {
    let mut engine = engine(SENTENCES);
    engine.jump_to_next_sentence();
    assert_eq!(engine.current_index(), 2);
    engine.jump_to_next_sentence();
    assert_eq!(engine.current_index(), 4);
    // No further sentence end: stay on the last word.
    engine.jump_to_next_sentence();
    assert_eq!(engine.current_index(), 4);
}

#[test]
fn previous_sentence_skips_one_full_sentence_back() {
    let mut engine = engine(SENTENCES);
    engine.go_to_word(4);
    engine.jump_to_previous_sentence();
    assert_eq!(engine.current_index(), 2);
    engine.jump_to_previous_sentence();
    assert_eq!(engine.current_index(), 0);
    engine.jump_to_previous_sentence();
    assert_eq!(engine.current_index(), 0);
}

#[test]
fn sentence_start_is_found_by_walking_back() {
    let mut engine = engine(SENTENCES);
    assert_eq!(engine.find_sentence_start(0), 0);
    assert_eq!(engine.find_sentence_start(1), 0);
    assert_eq!(engine.find_sentence_start(3), 2);
    assert_eq!(engine.find_sentence_start(4), 4);
    assert_eq!(engine.find_sentence_start(400), 4);

    engine.go_to_word(3);
    engine.jump_to_sentence_start();
    assert_eq!(engine.current_index(), 2);
}

#[test]
fn next_sentence_at_end_punctuation_moves_past_it() {
    let mut engine = engine(SENTENCES);
    engine.go_to_word(1);
    engine.jump_to_next_sentence();
    assert_eq!(engine.current_index(), 2);
}

#[test]
fn loading_words_cancels_and_resets() {
    let mut engine = engine("one two six ten red");
    engine.play(0);
    engine.load_words(process_text("a b c", 1), 7);

    assert_eq!(engine.state(), PlaybackState::Idle);
    assert_eq!(engine.next_tick_ms(), None);
    assert_eq!(engine.current_index(), 2);
    assert_eq!(engine.poll(u64::MAX), TickResult::NoRender);
    assert_eq!(engine.current_word().map(|w| w.chapter_index), Some(1));
}

#[test]
fn restored_index_is_clamped() {
    let engine = PlaybackEngine::new(
        process_text("one two six", 0),
        50,
        &ReaderPreferences::default(),
        (),
    );
    assert_eq!(engine.current_index(), 2);
}

#[test]
fn empty_sequence_never_plays() {
    let mut engine = engine("   ");
    engine.play(0);
    assert_eq!(engine.state(), PlaybackState::Idle);
    assert_eq!(engine.next_tick_ms(), None);

    engine.jump_forward();
    engine.jump_to_next_sentence();
    engine.go_to_word(3);
    assert!(engine.observer().positions.is_empty());

    let view = engine.view();
    assert!(view.word.is_none());
    assert_eq!(view.progress_percent, 0.0);
    assert!(engine.context_preview().is_none());
}

#[test]
fn progress_is_relative_to_the_last_index() {
    let mut engine = engine("one two six ten red");
    assert_eq!(engine.progress_percent(), 0.0);
    engine.go_to_word(2);
    assert_eq!(engine.progress_percent(), 50.0);
    engine.go_to_word(4);
    assert_eq!(engine.progress_percent(), 100.0);

    assert_eq!(self::engine("Alone").progress_percent(), 100.0);
}

#[test]
fn wpm_is_clamped_and_stepped() {
    let mut engine = engine("one");
    assert_eq!(engine.set_wpm(10), 100);
    assert_eq!(engine.set_wpm(2_000), 800);
    assert_eq!(
        engine.handle_intent(ReaderIntent::SpeedUp, 0),
        TickResult::NoRender
    );
    assert_eq!(
        engine.handle_intent(ReaderIntent::SlowDown, 0),
        TickResult::RenderRequested
    );
    assert_eq!(engine.wpm(), 775);
}

#[test]
fn intents_drive_transport_and_navigation() {
    let mut engine = engine(SENTENCES);
    engine.handle_intent(ReaderIntent::NextSentence, 0);
    assert_eq!(engine.current_index(), 2);
    engine.handle_intent(ReaderIntent::TogglePlayback, 0);
    assert!(engine.is_playing());
    engine.handle_intent(ReaderIntent::TogglePlayback, 0);
    assert_eq!(engine.state(), PlaybackState::Paused);
    engine.handle_intent(ReaderIntent::Stop, 0);
    assert_eq!(engine.current_index(), 0);
}

#[test]
fn preferences_change_punctuation_timing() {
    let mut engine = engine("done. now");
    let mut prefs = ReaderPreferences::default();
    prefs.pause_on_punctuation = false;
    engine.set_preferences(&prefs);
    engine.play(0);
    // Opening pause only: 240 * 1.5.
    assert_eq!(engine.next_tick_ms(), Some(360));
}

#[test]
fn view_exposes_the_split_word() {
    let mut engine = engine(SENTENCES);
    engine.go_to_word(3);
    let view = engine.view();
    assert_eq!(view.index, 3);
    assert_eq!(view.total, 5);
    assert_eq!(view.split.before, "se");
    assert_eq!(view.split.focus, "n");
    assert_eq!(view.split.after, "tence!");
    assert_eq!(view.wpm, 250);
}

#[test]
fn context_preview_covers_current_and_next_sentence() {
    let mut engine = engine(SENTENCES);
    engine.go_to_word(1);
    let preview = engine.context_preview().unwrap();
    let current: Vec<&str> = preview.current.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(current, ["Hello", "world."]);
    assert_eq!(preview.highlight, 1);
    assert_eq!(preview.highlighted().map(|w| w.text.as_str()), Some("world."));
    assert_eq!(preview.next_text(40).as_deref(), Some("Next sentence!"));

    engine.go_to_word(4);
    let preview = engine.context_preview().unwrap();
    assert_eq!(preview.current.len(), 1);
    assert!(preview.next.is_none());
}

#[test]
fn shutdown_cancels_the_timer() {
    let mut engine = engine("one two six");
    engine.play(0);
    engine.shutdown();
    assert_eq!(engine.next_tick_ms(), None);
    assert_eq!(engine.state(), PlaybackState::Paused);
}
