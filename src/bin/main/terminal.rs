use std::{
    io::{self, Stdout, Write},
    time::Duration,
};

use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use flicker_core::{
    PlaybackState, Theme,
    input::{InputEvent, InputProvider, ReaderIntent},
    pipeline::estimate_reading_minutes,
    settings::PositionStore,
    text_policy::time_ago_label,
};

use super::{ORP_ANCHOR_PERCENT, reader::Reader};

const HELP: &str = "space play  \u{2190}/\u{2192} jump  [ ] sentence  s restart sentence  < > chapter  \u{2191}/\u{2193} speed  esc stop  q quit";
const PROGRESS_BAR_WIDTH: usize = 30;

pub(super) fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(InputEvent::Quit),
            _ => None,
        };
    }

    let intent = match key.code {
        KeyCode::Char(' ') => ReaderIntent::TogglePlayback,
        KeyCode::Esc => ReaderIntent::Stop,
        KeyCode::Left | KeyCode::Char('h') => ReaderIntent::JumpBack,
        KeyCode::Right | KeyCode::Char('l') => ReaderIntent::JumpForward,
        KeyCode::Char('s') => ReaderIntent::SentenceStart,
        KeyCode::Char('[') => ReaderIntent::PreviousSentence,
        KeyCode::Char(']') => ReaderIntent::NextSentence,
        KeyCode::Up | KeyCode::Char('k') => ReaderIntent::SpeedUp,
        KeyCode::Down | KeyCode::Char('j') => ReaderIntent::SlowDown,
        KeyCode::Enter | KeyCode::Char('y') => return Some(InputEvent::Confirm),
        KeyCode::Char('n') => return Some(InputEvent::Dismiss),
        KeyCode::PageUp | KeyCode::Char('<') => return Some(InputEvent::PreviousChapter),
        KeyCode::PageDown | KeyCode::Char('>') => return Some(InputEvent::NextChapter),
        KeyCode::Char('q') => return Some(InputEvent::Quit),
        _ => return None,
    };
    Some(InputEvent::Intent(intent))
}

pub(super) fn map_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => map_key(key),
        Event::FocusLost => Some(InputEvent::Hidden),
        _ => None,
    }
}

/// Keyboard and focus events from the controlling terminal.
pub(super) struct TerminalInput {
    wait: Duration,
    resized: bool,
}

impl TerminalInput {
    pub(super) fn new() -> Self {
        Self {
            wait: Duration::ZERO,
            resized: false,
        }
    }

    /// Whether the terminal changed size since the last call.
    pub(super) fn take_resized(&mut self) -> bool {
        core::mem::take(&mut self.resized)
    }

    /// How long the next poll may block waiting for an event.
    pub(super) fn set_wait(&mut self, wait: Duration) {
        self.wait = wait;
    }
}

impl InputProvider for TerminalInput {
    type Error = io::Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        if !event::poll(self.wait)? {
            return Ok(None);
        }
        let event = event::read()?;
        if matches!(event, Event::Resize(..)) {
            self.resized = true;
        }
        Ok(map_event(event))
    }
}

/// Raw mode plus alternate screen for as long as the guard lives.
pub(super) struct TerminalGuard;

impl TerminalGuard {
    pub(super) fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableFocusChange,
            cursor::Hide
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            cursor::Show,
            DisableFocusChange,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Column where a word has to start so its focus letter sits on the anchor.
pub(super) fn word_start_column(width: u16, before_chars: usize) -> u16 {
    let anchor = usize::from(width) * ORP_ANCHOR_PERCENT / 100;
    anchor.saturating_sub(before_chars).min(usize::from(width)) as u16
}

pub(super) fn progress_bar(percent: f32, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f32).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

pub(super) struct Screen {
    out: Stdout,
    theme: Theme,
}

impl Screen {
    pub(super) fn new(theme: Theme) -> Self {
        Self {
            out: io::stdout(),
            theme,
        }
    }

    fn text_color(&self) -> Option<Color> {
        match self.theme {
            Theme::Light => Some(Color::Black),
            Theme::Dark => Some(Color::White),
            Theme::System => None,
        }
    }

    fn set_text_color(&mut self) -> io::Result<()> {
        match self.text_color() {
            Some(color) => queue!(self.out, SetForegroundColor(color)),
            None => queue!(self.out, ResetColor),
        }
    }

    pub(super) fn draw<S>(&mut self, title: &str, reader: &Reader<S>, now_ms: u64) -> io::Result<()>
    where
        S: PositionStore,
    {
        let (width, height) = terminal::size()?;
        let cols = usize::from(width);
        let middle = height / 2;

        queue!(self.out, terminal::Clear(ClearType::All))?;
        self.set_text_color()?;

        let mut heading = String::from(title);
        if reader.chapter_count() > 1 {
            heading.push_str(&format!(
                "  \u{b7}  {}/{} {}",
                reader.chapter() + 1,
                reader.chapter_count(),
                reader.chapter_title().unwrap_or("")
            ));
        }
        queue!(
            self.out,
            cursor::MoveTo(0, 0),
            SetAttribute(Attribute::Bold),
            Print(truncate(&heading, cols)),
            SetAttribute(Attribute::Reset)
        )?;
        self.set_text_color()?;

        let view = reader.view();
        if let Some(offer) = reader.resume_offer() {
            let notice = format!(
                "Picked up at chapter {}, word {}, last read {}  [enter]",
                offer.chapter_index + 1,
                offer.word_index + 1,
                time_ago_label(offer.age_ms(now_ms))
            );
            queue!(
                self.out,
                cursor::MoveTo(0, middle.saturating_sub(3)),
                Print(truncate(&notice, cols))
            )?;
        }

        if reader.is_finished() {
            queue!(self.out, cursor::MoveTo(0, middle), Print("Finished."))?;
        } else if view.word.is_some() {
            let before_chars = view.split.before.chars().count();
            let start = word_start_column(width, before_chars);
            let anchor = word_start_column(width, 0);
            queue!(
                self.out,
                cursor::MoveTo(anchor, middle.saturating_sub(1)),
                Print("\u{25be}"),
                cursor::MoveTo(start, middle),
                Print(view.split.before),
                SetForegroundColor(Color::Red),
                SetAttribute(Attribute::Bold),
                Print(view.split.focus),
                SetAttribute(Attribute::Reset)
            )?;
            self.set_text_color()?;
            queue!(self.out, Print(view.split.after))?;
        } else {
            queue!(self.out, cursor::MoveTo(0, middle), Print("Nothing to read."))?;
        }

        if let Some(preview) = reader.context_preview() {
            let (before, current, after) = preview.current_parts();
            queue!(self.out, cursor::MoveTo(0, middle + 2))?;
            let mut used = 0usize;
            for word in before {
                used += word.text.chars().count() + 1;
                queue!(self.out, Print(&word.text), Print(" "))?;
            }
            if let Some(word) = current {
                used += word.text.chars().count() + 1;
                queue!(
                    self.out,
                    SetAttribute(Attribute::Reverse),
                    Print(&word.text),
                    SetAttribute(Attribute::Reset),
                    Print(" ")
                )?;
                self.set_text_color()?;
            }
            let rest: Vec<&str> = after.iter().map(|word| word.text.as_str()).collect();
            queue!(
                self.out,
                Print(truncate(&rest.join(" "), cols.saturating_sub(used)))
            )?;

            if let Some(next) = preview.next_text(cols.saturating_sub(6)) {
                queue!(
                    self.out,
                    cursor::MoveTo(0, middle + 3),
                    SetAttribute(Attribute::Dim),
                    Print(format!("Next: {next}")),
                    SetAttribute(Attribute::Reset)
                )?;
                self.set_text_color()?;
            }
        }

        let state = match view.state {
            PlaybackState::Idle => "stopped",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        };
        let minutes_left = estimate_reading_minutes(view.total.saturating_sub(view.index), view.wpm);
        let status = format!(
            "{} {:>3.0}%  {}/{}  {} wpm  {}  ~{} min left",
            progress_bar(view.progress_percent, PROGRESS_BAR_WIDTH),
            view.progress_percent,
            (view.index + 1).min(view.total),
            view.total,
            view.wpm,
            state,
            minutes_left
        );
        queue!(
            self.out,
            cursor::MoveTo(0, height.saturating_sub(2)),
            Print(truncate(&status, cols)),
            cursor::MoveTo(0, height.saturating_sub(1)),
            SetAttribute(Attribute::Dim),
            Print(truncate(HELP, cols)),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;

        self.out.flush()
    }
}
