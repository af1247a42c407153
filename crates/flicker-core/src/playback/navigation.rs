impl<O> PlaybackEngine<O>
where
    O: PlaybackObserver,
{
    pub fn jump_back(&mut self) {
        if self.words.is_empty() {
            return;
        }
        self.move_to(self.index.saturating_sub(self.config.jump_words));
    }

    pub fn jump_forward(&mut self) {
        if self.words.is_empty() {
            return;
        }
        let target = self.index.saturating_add(self.config.jump_words);
        self.move_to(self.clamp_index(target));
    }

    pub fn go_to_word(&mut self, index: usize) {
        if self.words.is_empty() {
            return;
        }
        self.move_to(self.clamp_index(index));
    }

    /// First word of the sentence containing `from`: the word right after the
    /// nearest earlier end punctuation, or `0`.
    pub fn find_sentence_start(&self, from: usize) -> usize {
        let from = from.min(self.words.len());
        self.words[..from]
            .iter()
            .rposition(|word| word.has_end_punctuation)
            .map_or(0, |end| end + 1)
    }

    pub fn jump_to_sentence_start(&mut self) {
        if self.words.is_empty() {
            return;
        }
        self.move_to(self.find_sentence_start(self.index));
    }

    /// Skips back one full sentence from the start of the current one.
    pub fn jump_to_previous_sentence(&mut self) {
        if self.words.is_empty() {
            return;
        }

        let current_start = self.find_sentence_start(self.index);
        let target = if current_start == 0 {
            0
        } else {
            self.find_sentence_start(current_start - 1)
        };
        self.move_to(target);
    }

    /// Lands after the next end punctuation at or after the current word, or
    /// on the last word when there is none.
    pub fn jump_to_next_sentence(&mut self) {
        if self.words.is_empty() {
            return;
        }

        let last = self.last_index();
        let target = self.words[self.index..]
            .iter()
            .position(|word| word.has_end_punctuation)
            .map_or(last, |offset| (self.index + offset + 1).min(last));
        self.move_to(target);
    }

    pub fn sentence_bounds(&self, index: usize) -> Option<SentenceBounds> {
        if self.words.is_empty() {
            return None;
        }

        let index = self.clamp_index(index);
        Some(SentenceBounds {
            start: self.find_sentence_start(index),
            end: self.sentence_end_from(index),
        })
    }

    /// Sentence following one that ends at `current_end`.
    pub fn next_sentence_bounds(&self, current_end: usize) -> Option<SentenceBounds> {
        let start = current_end.checked_add(1)?;
        if start >= self.words.len() {
            return None;
        }

        Some(SentenceBounds {
            start,
            end: self.sentence_end_from(start),
        })
    }

    fn sentence_end_from(&self, index: usize) -> usize {
        self.words[index..]
            .iter()
            .position(|word| word.has_end_punctuation)
            .map_or(self.last_index(), |offset| index + offset)
    }
}
