use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use flicker_core::settings::{
    PositionStore, PreferencesStore, ReaderPreferences, ReadingPosition, Theme,
};

const POSITION_MAGIC: u32 = 0x3150_4C46; // "FLP1"
const POSITION_VERSION: u8 = 1;
const POSITION_HEADER_LEN: usize = 28;
const BOOK_ID_MAX_BYTES: usize = 255;

const PREFERENCES_MAGIC: u32 = 0x3153_4C46; // "FLS1"
const PREFERENCES_VERSION: u8 = 1;
const PREFERENCES_RECORD_LEN: usize = 20;

const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub(super) enum RecordError {
    #[error("record file i/o failed: {0:?}")]
    Io(io::ErrorKind),
    #[error("record checksum or field mismatch")]
    Corrupted,
    #[error("book id does not fit a record")]
    Unsupported,
}

impl From<io::Error> for RecordError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.kind())
    }
}

/// Record files under a data directory: one per book plus one for
/// preferences.
#[derive(Debug, Clone)]
pub(super) struct RecordFileStore {
    root: PathBuf,
}

impl RecordFileStore {
    pub(super) fn open(root: impl Into<PathBuf>) -> Result<Self, RecordError> {
        let root = root.into();
        fs::create_dir_all(root.join("positions"))?;
        Ok(Self { root })
    }

    fn position_path(&self, book_id: &str) -> PathBuf {
        self.root
            .join("positions")
            .join(format!("{}.rec", file_stem_for(book_id)))
    }

    fn preferences_path(&self) -> PathBuf {
        self.root.join("preferences.rec")
    }
}

impl PositionStore for RecordFileStore {
    type Error = RecordError;

    fn get(&mut self, book_id: &str) -> Result<Option<ReadingPosition>, Self::Error> {
        let Some(buf) = read_record(&self.position_path(book_id))? else {
            return Ok(None);
        };
        let position = decode_position(&buf)?;
        Ok(position.filter(|position| position.book_id == book_id))
    }

    fn put(&mut self, position: &ReadingPosition) -> Result<(), Self::Error> {
        let buf = encode_position(position)?;
        write_record(&self.position_path(&position.book_id), &buf, true)
    }

    fn delete(&mut self, book_id: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.position_path(book_id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn put_best_effort(&mut self, position: &ReadingPosition) {
        if let Ok(buf) = encode_position(position) {
            let _ = write_record(&self.position_path(&position.book_id), &buf, false);
        }
    }
}

impl PreferencesStore for RecordFileStore {
    type Error = RecordError;

    fn load(&mut self) -> Result<Option<ReaderPreferences>, Self::Error> {
        match read_record(&self.preferences_path())? {
            Some(buf) => decode_preferences(&buf),
            None => Ok(None),
        }
    }

    fn save(&mut self, preferences: &ReaderPreferences) -> Result<(), Self::Error> {
        let buf = encode_preferences(preferences);
        write_record(&self.preferences_path(), &buf, true)
    }
}

fn read_record(path: &Path) -> Result<Option<Vec<u8>>, RecordError> {
    match fs::read(path) {
        Ok(buf) => Ok(Some(buf)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn write_record(path: &Path, buf: &[u8], sync: bool) -> Result<(), RecordError> {
    let mut file = File::create(path)?;
    file.write_all(buf)?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

/// Book ids become file names; anything outside `[A-Za-z0-9_-]` is replaced.
fn file_stem_for(book_id: &str) -> String {
    let stem: String = book_id
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        String::from("_")
    } else {
        stem
    }
}

// Layout: magic u32, version u8, 3 reserved, chapter u32, word u32,
// timestamp u64, id length u16, 2 reserved, id bytes, checksum u32.
fn encode_position(position: &ReadingPosition) -> Result<Vec<u8>, RecordError> {
    let id = position.book_id.as_bytes();
    if id.len() > BOOK_ID_MAX_BYTES {
        return Err(RecordError::Unsupported);
    }
    let chapter = u32::try_from(position.chapter_index).map_err(|_| RecordError::Unsupported)?;
    let word = u32::try_from(position.word_index).map_err(|_| RecordError::Unsupported)?;

    let mut buf = vec![0u8; POSITION_HEADER_LEN + id.len() + CHECKSUM_LEN];
    buf[0..4].copy_from_slice(&POSITION_MAGIC.to_le_bytes());
    buf[4] = POSITION_VERSION;
    buf[8..12].copy_from_slice(&chapter.to_le_bytes());
    buf[12..16].copy_from_slice(&word.to_le_bytes());
    buf[16..24].copy_from_slice(&position.timestamp_ms.to_le_bytes());
    buf[24..26].copy_from_slice(&(id.len() as u16).to_le_bytes());
    buf[POSITION_HEADER_LEN..POSITION_HEADER_LEN + id.len()].copy_from_slice(id);

    let body_len = buf.len() - CHECKSUM_LEN;
    let checksum = checksum32(&buf[..body_len]);
    buf[body_len..].copy_from_slice(&checksum.to_le_bytes());
    Ok(buf)
}

fn decode_position(buf: &[u8]) -> Result<Option<ReadingPosition>, RecordError> {
    if buf.len() < 5 || u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) != POSITION_MAGIC {
        return Ok(None);
    }
    if buf[4] != POSITION_VERSION {
        return Ok(None);
    }
    if buf.len() < POSITION_HEADER_LEN + CHECKSUM_LEN {
        return Err(RecordError::Corrupted);
    }

    let id_len = u16::from_le_bytes([buf[24], buf[25]]) as usize;
    let body_len = POSITION_HEADER_LEN + id_len;
    if buf.len() != body_len + CHECKSUM_LEN {
        return Err(RecordError::Corrupted);
    }

    let expected = u32::from_le_bytes([
        buf[body_len],
        buf[body_len + 1],
        buf[body_len + 2],
        buf[body_len + 3],
    ]);
    if checksum32(&buf[..body_len]) != expected {
        return Err(RecordError::Corrupted);
    }

    let book_id = std::str::from_utf8(&buf[POSITION_HEADER_LEN..body_len])
        .map_err(|_| RecordError::Corrupted)?;
    let chapter = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    let word = u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]);
    let mut timestamp = [0u8; 8];
    timestamp.copy_from_slice(&buf[16..24]);

    Ok(Some(ReadingPosition {
        book_id: book_id.to_owned(),
        chapter_index: chapter as usize,
        word_index: word as usize,
        timestamp_ms: u64::from_le_bytes(timestamp),
    }))
}

// Layout: magic u32, version u8, theme u8, flags u8, reserved u8, wpm u16,
// 2 reserved, multiplier f32, checksum u32.
fn encode_preferences(preferences: &ReaderPreferences) -> [u8; PREFERENCES_RECORD_LEN] {
    let mut buf = [0u8; PREFERENCES_RECORD_LEN];
    buf[0..4].copy_from_slice(&PREFERENCES_MAGIC.to_le_bytes());
    buf[4] = PREFERENCES_VERSION;
    buf[5] = match preferences.theme {
        Theme::Light => 0,
        Theme::Dark => 1,
        Theme::System => 2,
    };
    buf[6] = u8::from(preferences.pause_on_punctuation);
    buf[8..10].copy_from_slice(&preferences.wpm().to_le_bytes());
    buf[12..16].copy_from_slice(&preferences.punctuation_pause_multiplier.to_le_bytes());

    let checksum = checksum32(&buf[..16]);
    buf[16..20].copy_from_slice(&checksum.to_le_bytes());
    buf
}

fn decode_preferences(buf: &[u8]) -> Result<Option<ReaderPreferences>, RecordError> {
    if buf.len() < 5 || u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) != PREFERENCES_MAGIC {
        return Ok(None);
    }
    if buf[4] != PREFERENCES_VERSION {
        return Ok(None);
    }
    if buf.len() != PREFERENCES_RECORD_LEN {
        return Err(RecordError::Corrupted);
    }

    let expected = u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]);
    if checksum32(&buf[..16]) != expected {
        return Err(RecordError::Corrupted);
    }

    let theme = match buf[5] {
        0 => Theme::Light,
        1 => Theme::Dark,
        2 => Theme::System,
        _ => return Err(RecordError::Corrupted),
    };
    let multiplier = f32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]);
    if !multiplier.is_finite() {
        return Err(RecordError::Corrupted);
    }

    Ok(Some(ReaderPreferences::new(
        u16::from_le_bytes([buf[8], buf[9]]),
        theme,
        (buf[6] & 0x01) != 0,
        multiplier,
    )))
}

fn checksum32(bytes: &[u8]) -> u32 {
    let mut hash = 0x811C9DC5u32;
    for b in bytes {
        hash ^= *b as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash
}
