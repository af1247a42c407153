use alloc::string::String;

/// Returns the next whitespace-delimited word at or after `cursor` together
/// with the byte offset just past it.
pub fn next_word_at(text: &str, cursor: usize) -> Option<(&str, usize)> {
    let rest = text.get(cursor..)?;
    let start = cursor + rest.find(|ch: char| !ch.is_whitespace())?;
    let end = text[start..]
        .find(char::is_whitespace)
        .map_or(text.len(), |offset| start + offset);

    Some((&text[start..end], end))
}

pub fn count_words(text: &str) -> usize {
    let mut count = 0usize;
    let mut cursor = 0usize;

    while let Some((_, next_cursor)) = next_word_at(text, cursor) {
        count += 1;
        cursor = next_cursor;
    }

    count
}

/// Collapses every whitespace run (newlines included) into one space.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut cursor = 0usize;

    while let Some((word, next_cursor)) = next_word_at(raw, cursor) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        cursor = next_cursor;
    }

    out
}

/// Line-ending cleanup for pasted text: CRLF and lone CR become LF, runs of
/// three or more newlines shrink to a single blank line, ends are trimmed.
pub fn prepare_pasted_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut newline_run = 0usize;
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        let ch = if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            '\n'
        } else {
            ch
        };

        if ch == '\n' {
            newline_run += 1;
            if newline_run > 2 {
                continue;
            }
        } else {
            newline_run = 0;
        }
        out.push(ch);
    }

    String::from(out.trim())
}
