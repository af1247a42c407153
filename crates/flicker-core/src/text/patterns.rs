//! Byte-level token classifiers used by the tokenizer.

const BREAK_SYMBOLS: [char; 6] = ['*', '#', '-', '_', '=', '~'];
const BULLET_BREAK: &str = "\u{2022}\u{2022}\u{2022}";
const MIN_BREAK_RUN: usize = 3;

const HEADER_KEYWORDS: [&str; 11] = [
    "chapter",
    "part",
    "section",
    "book",
    "act",
    "scene",
    "prologue",
    "epilogue",
    "introduction",
    "conclusion",
    "appendix",
];

const ROMAN_DIGITS: &[u8] = b"IVXLCDM";
const CURRENCY_SYMBOLS: [char; 4] = ['$', '\u{20ac}', '\u{a3}', '\u{a5}'];
const ORDINAL_SUFFIXES: [&[u8]; 4] = [b"st", b"nd", b"rd", b"th"];

pub(super) fn is_section_break(token: &str) -> bool {
    if token == BULLET_BREAK {
        return true;
    }

    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    BREAK_SYMBOLS.contains(&first)
        && token.chars().count() >= MIN_BREAK_RUN
        && chars.all(|ch| ch == first)
}

/// Case-insensitive keyword prefix followed by a word boundary.
pub(super) fn starts_with_header_keyword(token: &str) -> bool {
    let bytes = token.as_bytes();

    HEADER_KEYWORDS.iter().any(|keyword| {
        let keyword = keyword.as_bytes();
        bytes.len() >= keyword.len()
            && bytes[..keyword.len()].eq_ignore_ascii_case(keyword)
            && bytes.get(keyword.len()).is_none_or(|b| !is_word_byte(*b))
    })
}

/// `12.`, `3)`, `[4]`, `XIV.` or `B.` standing alone.
pub(super) fn is_numbered_header(token: &str) -> bool {
    match token.as_bytes() {
        [b'[', inner @ .., b']'] => all_digits(inner),
        [head @ .., b')'] => all_digits(head),
        [head @ .., b'.'] => {
            all_digits(head)
                || (!head.is_empty() && head.iter().all(|b| ROMAN_DIGITS.contains(b)))
                || matches!(head, [letter] if letter.is_ascii_uppercase())
        }
        _ => false,
    }
}

pub(super) fn is_all_caps(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() > 1 && bytes.iter().all(u8::is_ascii_uppercase)
}

pub(super) fn has_lowercase(token: &str) -> bool {
    token.chars().any(char::is_lowercase)
}

pub(super) fn has_end_punctuation(token: &str) -> bool {
    token.ends_with(['.', '!', '?'])
}

pub(super) fn has_pause_punctuation(token: &str) -> bool {
    token.ends_with([',', ';', ':'])
}

/// Which numeric shapes a token contains.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(super) struct NumericProfile {
    pub digit: bool,
    pub percentage: bool,
    pub currency: bool,
    pub date: bool,
    pub time: bool,
}

impl NumericProfile {
    pub(super) fn of(token: &str) -> Self {
        let bytes = token.as_bytes();
        Self {
            digit: bytes.iter().any(u8::is_ascii_digit),
            percentage: bytes
                .windows(2)
                .any(|pair| pair[0].is_ascii_digit() && pair[1] == b'%'),
            currency: has_currency(token),
            date: has_date(bytes) || has_ordinal(bytes),
            time: has_time(bytes),
        }
    }

    pub(super) fn any(self) -> bool {
        self.digit || self.percentage || self.currency || self.date || self.time
    }

    /// Minimum pause multiplier this numeric shape asks for.
    pub(super) fn pause_floor(self) -> Option<f32> {
        if !self.any() {
            None
        } else if self.date || self.time || self.currency {
            Some(1.4)
        } else if self.percentage {
            Some(1.25)
        } else {
            Some(1.15)
        }
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn all_digits(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit)
}

fn has_currency(token: &str) -> bool {
    let mut chars = token.chars().peekable();
    while let Some(ch) = chars.next() {
        if CURRENCY_SYMBOLS.contains(&ch) && chars.peek().is_some_and(char::is_ascii_digit) {
            return true;
        }
    }

    // Whole-token amount such as `19.99` or `3,50`.
    let bytes = token.as_bytes();
    let len = bytes.len();
    len >= 4
        && matches!(bytes[len - 3], b'.' | b',')
        && all_digits(&bytes[len - 2..])
        && all_digits(&bytes[..len - 3])
}

/// `d{1,4}[-/]d{1,2}[-/]d{1,4}` anywhere in the token.
fn has_date(bytes: &[u8]) -> bool {
    let is_sep = |b: u8| b == b'-' || b == b'/';

    (1..bytes.len()).any(|i| {
        if !is_sep(bytes[i]) || !bytes[i - 1].is_ascii_digit() {
            return false;
        }
        let middle = bytes[i + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        let second_sep = i + 1 + middle;
        (1..=2).contains(&middle)
            && bytes.get(second_sep).is_some_and(|b| is_sep(*b))
            && bytes.get(second_sep + 1).is_some_and(u8::is_ascii_digit)
    })
}

/// `5th`, `21st`, `2ND`.
fn has_ordinal(bytes: &[u8]) -> bool {
    (0..bytes.len()).any(|i| {
        bytes[i].is_ascii_digit()
            && bytes.get(i + 1..i + 3).is_some_and(|suffix| {
                ORDINAL_SUFFIXES
                    .iter()
                    .any(|ordinal| suffix.eq_ignore_ascii_case(ordinal))
            })
    })
}

/// `d{1,2}:d{2}` anywhere in the token.
fn has_time(bytes: &[u8]) -> bool {
    (1..bytes.len()).any(|i| {
        bytes[i] == b':'
            && bytes[i - 1].is_ascii_digit()
            && bytes.get(i + 1..i + 3).is_some_and(all_digits)
    })
}
