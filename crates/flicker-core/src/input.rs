//! Input abstraction layer.

/// Reader actions the playback engine understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReaderIntent {
    TogglePlayback,
    Stop,
    JumpBack,
    JumpForward,
    SentenceStart,
    PreviousSentence,
    NextSentence,
    SpeedUp,
    SlowDown,
}

/// Everything a host front end can report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputEvent {
    Intent(ReaderIntent),
    /// Acknowledge a pending prompt.
    Confirm,
    /// Decline a pending prompt.
    Dismiss,
    PreviousChapter,
    NextChapter,
    /// The reading surface lost visibility (window hidden, focus lost).
    Hidden,
    Quit,
}

/// Polled input provider.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error>;
}
