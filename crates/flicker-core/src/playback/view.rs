impl<O> PlaybackEngine<O>
where
    O: PlaybackObserver,
{
    /// `index / (len - 1)` as a percentage; 0 when empty, 100 for one word.
    pub fn progress_percent(&self) -> f32 {
        match self.words.len() {
            0 => 0.0,
            1 => 100.0,
            len => self.index as f32 / (len - 1) as f32 * 100.0,
        }
    }

    pub fn view(&self) -> ReaderView<'_> {
        let word = self.current_word();
        ReaderView {
            word,
            split: word.map_or(OrpSplit::default(), |word| split_word_by_orp(&word.text)),
            state: self.state,
            index: self.index,
            total: self.words.len(),
            progress_percent: self.progress_percent(),
            wpm: self.wpm,
        }
    }

    pub fn context_preview(&self) -> Option<ContextPreview<'_>> {
        let current = self.sentence_bounds(self.index)?;
        let next = self
            .next_sentence_bounds(current.end)
            .map(|bounds| &self.words[bounds.start..=bounds.end]);

        Some(ContextPreview {
            current: &self.words[current.start..=current.end],
            highlight: self.index - current.start,
            next,
        })
    }
}
