use std::{fs, path::Path};

use flicker_core::{
    Word,
    pipeline::{TextContent, parse_text_input},
};
use serde::Deserialize;

/// Pasted text handed over for a one-off read. Nothing about it is saved.
#[derive(Debug, Deserialize)]
struct QuickReadSession {
    text: String,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub(super) enum SessionError {
    #[error("could not read session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse text content: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("no readable text found")]
    NoReadableText,
}

pub(super) fn parse_session(json: &str) -> Result<(Vec<Word>, TextContent), SessionError> {
    let session: QuickReadSession = serde_json::from_str(json)?;
    let (words, content) = parse_text_input(&session.text, session.title.as_deref());
    if words.is_empty() {
        return Err(SessionError::NoReadableText);
    }
    Ok((words, content))
}

pub(super) fn load_session(path: &Path) -> Result<(Vec<Word>, TextContent), SessionError> {
    let json = fs::read_to_string(path)?;
    parse_session(&json)
}
