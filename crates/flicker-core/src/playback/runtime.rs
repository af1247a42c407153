impl<O> PlaybackEngine<O>
where
    O: PlaybackObserver,
{
    /// Starts or resumes playback. An engine sitting on the last word starts
    /// over from the first one.
    pub fn play(&mut self, now_ms: u64) {
        if self.words.is_empty() || self.state == PlaybackState::Playing {
            return;
        }

        if self.index > 0 && self.index >= self.last_index() {
            self.move_to(0);
        }

        self.state = PlaybackState::Playing;
        let delay = self.current_delay_ms();
        self.timer.arm(now_ms, delay);
        debug!(
            "playback: play index={} wpm={} first_delay_ms={}",
            self.index, self.wpm, delay
        );
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }

        self.timer.cancel();
        self.state = PlaybackState::Paused;
        debug!("playback: pause index={}", self.index);
    }

    pub fn toggle(&mut self, now_ms: u64) {
        if self.state == PlaybackState::Playing {
            self.pause();
        } else {
            self.play(now_ms);
        }
    }

    pub fn stop(&mut self) {
        self.timer.cancel();
        self.state = PlaybackState::Idle;
        self.move_to(0);
        debug!("playback: stop");
    }

    /// Advances one word and schedules the next advance.
    ///
    /// Does nothing unless playing, so a fire that raced a pause or stop is
    /// harmless.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        if self.state != PlaybackState::Playing {
            return TickResult::NoRender;
        }

        if self.index >= self.last_index() {
            self.timer.cancel();
            self.state = PlaybackState::Idle;
            debug!("playback: complete words={}", self.words.len());
            self.observer.on_complete();
            return TickResult::RenderRequested;
        }

        self.move_to(self.index + 1);
        let delay = self.current_delay_ms();
        self.timer.arm(now_ms, delay);
        TickResult::RenderRequested
    }

    /// Fires the pending advance once its deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> TickResult {
        if self.timer.take_due(now_ms) {
            self.tick(now_ms)
        } else {
            TickResult::NoRender
        }
    }

    /// Swaps in a new sequence (chapter change). Any pending advance is
    /// cancelled before the index moves.
    pub fn load_words(&mut self, words: Vec<Word>, initial_index: usize) {
        self.timer.cancel();
        self.state = PlaybackState::Idle;
        self.words = words;
        self.index = self.clamp_index(initial_index);
        debug!(
            "playback: load words={} index={}",
            self.words.len(),
            self.index
        );
    }

    /// Cancels the pending advance before the engine goes away.
    pub fn shutdown(&mut self) {
        self.timer.cancel();
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Clamps into the configured range; the next tick picks the value up.
    pub fn set_wpm(&mut self, wpm: u16) -> u16 {
        self.wpm = wpm.clamp(self.config.min_wpm, self.config.max_wpm);
        self.wpm
    }

    pub fn adjust_wpm(&mut self, increase: bool) -> bool {
        let next = if increase {
            self.wpm.saturating_add(self.config.wpm_step)
        } else {
            self.wpm.saturating_sub(self.config.wpm_step)
        };

        let previous = self.wpm;
        self.set_wpm(next) != previous
    }

    pub fn set_preferences(&mut self, preferences: &ReaderPreferences) {
        self.set_wpm(preferences.wpm());
        self.pause_on_punctuation = preferences.pause_on_punctuation;
        self.punctuation_multiplier = preferences.punctuation_pause_multiplier;
    }

    pub fn handle_intent(&mut self, intent: ReaderIntent, now_ms: u64) -> TickResult {
        match intent {
            ReaderIntent::TogglePlayback => self.toggle(now_ms),
            ReaderIntent::Stop => self.stop(),
            ReaderIntent::JumpBack => self.jump_back(),
            ReaderIntent::JumpForward => self.jump_forward(),
            ReaderIntent::SentenceStart => self.jump_to_sentence_start(),
            ReaderIntent::PreviousSentence => self.jump_to_previous_sentence(),
            ReaderIntent::NextSentence => self.jump_to_next_sentence(),
            ReaderIntent::SpeedUp => {
                if !self.adjust_wpm(true) {
                    return TickResult::NoRender;
                }
            }
            ReaderIntent::SlowDown => {
                if !self.adjust_wpm(false) {
                    return TickResult::NoRender;
                }
            }
        }

        TickResult::RenderRequested
    }
}
