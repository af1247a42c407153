use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use anyhow::Context;
use clap::Parser;
use flicker_core::{
    PositionTracker, ReaderPreferences, Theme,
    content::StaticChapterSource,
    input::{InputEvent, InputProvider, ReaderIntent},
    pipeline::{estimate_reading_minutes, estimate_text_minutes},
    settings::{PositionStore, PreferencesStore},
};
use log::{debug, info, warn};

use reader::{Flow, Reader};
use settings_sync::SettingsSyncState;
use storage::RecordFileStore;
use terminal::{Screen, TerminalGuard, TerminalInput};

#[path = "main/logging.rs"]
mod logging;
#[path = "main/reader.rs"]
mod reader;
#[path = "main/session.rs"]
mod session;
#[path = "main/settings_sync.rs"]
mod settings_sync;
#[path = "main/storage.rs"]
mod storage;
#[path = "main/terminal.rs"]
mod terminal;

const ORP_ANCHOR_PERCENT: usize = 42;
const SETTINGS_SAVE_DEBOUNCE_MS: u64 = 1_500;
const IDLE_WAIT_MS: u64 = 250;

/// Speed-read plain text one word at a time.
#[derive(Debug, Parser)]
#[command(name = "flicker", version)]
struct Args {
    /// Plain-text chapter files, read in order.
    #[arg(required_unless_present = "session", conflicts_with = "session")]
    files: Vec<PathBuf>,

    /// Quick-read session JSON (`{"text": "...", "title": "..."}`). Nothing is saved.
    #[arg(long)]
    session: Option<PathBuf>,

    /// Key for the saved reading position; defaults to the first file's name.
    #[arg(long)]
    book_id: Option<String>,

    /// Reading speed for this run.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    wpm: Option<u16>,

    /// Read every chapter as one sequence.
    #[arg(long)]
    continuous: bool,

    #[arg(long)]
    no_punctuation_pause: bool,

    #[arg(long, value_parser = parse_multiplier)]
    punctuation_multiplier: Option<f32>,

    /// light, dark or system.
    #[arg(long, value_parser = parse_theme)]
    theme: Option<Theme>,

    /// Drop the saved position and start from the beginning.
    #[arg(long, conflicts_with = "session")]
    forget: bool,

    /// Where positions, preferences and the log live.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn parse_multiplier(value: &str) -> Result<f32, String> {
    let multiplier: f32 = value.parse().map_err(|_| format!("not a number: {value}"))?;
    if !multiplier.is_finite() || multiplier < 1.0 {
        return Err(String::from("must be a finite value of at least 1.0"));
    }
    Ok(multiplier)
}

fn parse_theme(value: &str) -> Result<Theme, String> {
    Theme::parse(value).ok_or_else(|| format!("unknown theme: {value}"))
}

fn apply_overrides(preferences: &mut ReaderPreferences, args: &Args) {
    if let Some(wpm) = args.wpm {
        preferences.set_wpm(wpm);
    }
    if args.no_punctuation_pause {
        preferences.pause_on_punctuation = false;
    }
    if let Some(multiplier) = args.punctuation_multiplier {
        preferences.punctuation_pause_multiplier = multiplier;
    }
    if let Some(theme) = args.theme {
        preferences.theme = theme;
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flicker")
}

fn default_book_id(files: &[PathBuf]) -> String {
    files
        .first()
        .and_then(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| String::from("book"))
}

fn load_chapters(files: &[PathBuf], wpm: u16) -> anyhow::Result<StaticChapterSource> {
    let mut source = StaticChapterSource::default();
    for path in files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading chapter {}", path.display()))?;
        let title = chapter_title(path);
        debug!("chapter: {title} minutes={}", estimate_text_minutes(&text, wpm));
        source.push(title, text);
    }
    Ok(source)
}

fn open_tracker<S>(book_id: String, store: S, forget: bool) -> PositionTracker<S>
where
    S: PositionStore,
{
    let mut tracker = PositionTracker::new(book_id, 0, store);
    if forget {
        if tracker.clear_position() {
            info!("book: saved position cleared id={}", tracker.book_id());
        } else {
            warn!("book: clearing saved position failed id={}", tracker.book_id());
        }
    }
    tracker
}

fn chapter_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Monotonic milliseconds, anchored at the wall clock of process start.
#[derive(Clone, Copy, Debug)]
struct Clock {
    started: Instant,
    epoch_at_start_ms: u64,
}

impl Clock {
    fn start() -> Self {
        let epoch_at_start_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64);
        Self {
            started: Instant::now(),
            epoch_at_start_ms,
        }
    }

    fn now_ms(&self) -> u64 {
        let elapsed = self.started.elapsed().as_millis() as u64;
        self.epoch_at_start_ms.saturating_add(elapsed)
    }
}

fn wait_until(deadline_ms: Option<u64>, now_ms: u64) -> Duration {
    let wait_ms = deadline_ms.map_or(IDLE_WAIT_MS, |deadline| {
        deadline.saturating_sub(now_ms).min(IDLE_WAIT_MS)
    });
    Duration::from_millis(wait_ms)
}

fn earliest(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let clock = Clock::start();

    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;
    logging::init(&data_dir)?;
    info!("flicker v{} data_dir={}", env!("CARGO_PKG_VERSION"), data_dir.display());

    let mut store = RecordFileStore::open(&data_dir).context("opening record store")?;
    let mut saved_preferences = match store.load() {
        Ok(preferences) => preferences.unwrap_or_default(),
        Err(err) => {
            warn!("settings: load failed: {err}");
            ReaderPreferences::default()
        }
    };
    let mut preferences = saved_preferences;
    apply_overrides(&mut preferences, &args);

    let (title, source, tracker) = match &args.session {
        Some(path) => {
            let (words, content) = session::load_session(path)
                .with_context(|| format!("loading session {}", path.display()))?;
            info!(
                "session: title={:?} words={} minutes={}",
                content.title,
                words.len(),
                estimate_reading_minutes(content.word_count, preferences.wpm())
            );
            let mut source = StaticChapterSource::default();
            source.push(content.title.clone(), content.text);
            (content.title, source, None)
        }
        None => {
            let source = load_chapters(&args.files, preferences.wpm())?;
            let book_id = args
                .book_id
                .clone()
                .unwrap_or_else(|| default_book_id(&args.files));
            info!("book: id={book_id} chapters={}", args.files.len());
            let tracker = open_tracker(book_id.clone(), store.clone(), args.forget);
            (book_id, source, Some(tracker))
        }
    };

    let mut reader = Reader::open(source, args.continuous, &preferences, tracker, clock.now_ms());
    let mut settings_sync = SettingsSyncState::new(saved_preferences);

    let guard = TerminalGuard::enter().context("preparing terminal")?;
    let mut screen = Screen::new(preferences.theme);
    let mut input = TerminalInput::new();

    let result = (|| -> anyhow::Result<()> {
        let mut needs_render = true;
        loop {
            let now_ms = clock.now_ms();
            if reader.poll(now_ms) == Flow::Render {
                needs_render = true;
            }
            settings_sync.flush_if_due(&mut store, now_ms);

            if needs_render || input.take_resized() {
                screen.draw(&title, &reader, now_ms).context("drawing frame")?;
                needs_render = false;
            }

            let deadline = earliest(reader.next_deadline_ms(), settings_sync.due_at_ms());
            input.set_wait(wait_until(deadline, now_ms));
            let Some(event) = input.poll_event().context("reading terminal input")? else {
                continue;
            };

            let now_ms = clock.now_ms();
            match reader.handle_event(event, now_ms) {
                Flow::Quit => return Ok(()),
                Flow::Render => needs_render = true,
                Flow::Idle => {}
            }

            // Speed keys persist the speed; flags given on the command line do not.
            let speed_key = matches!(
                event,
                InputEvent::Intent(ReaderIntent::SpeedUp | ReaderIntent::SlowDown)
            );
            if speed_key && saved_preferences.set_wpm(reader.engine().wpm()) {
                settings_sync.track_current(saved_preferences, now_ms);
            }
        }
    })();

    let now_ms = clock.now_ms();
    reader.shutdown(now_ms);
    settings_sync.flush(&mut store, now_ms);
    drop(guard);
    info!("exit");

    result
}
