//! Optimal recognition point (fixation letter) placement.

/// Word split around its fixation letter.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OrpSplit<'a> {
    pub before: &'a str,
    pub focus: &'a str,
    pub after: &'a str,
}

/// Fixation index counted in letters only.
pub fn calculate_orp(word: &str) -> usize {
    let letters = word.chars().filter(char::is_ascii_alphabetic).count();

    match letters {
        0..=3 => 0,
        4..=5 => 1,
        6..=9 => 2,
        10..=13 => 3,
        _ => 4,
    }
}

/// Char index of the fixation letter inside `token`, offset past any leading
/// non-letters. Equals the char length of `token` when it has no letters.
pub fn orp_char_index(token: &str) -> usize {
    let leading = token
        .chars()
        .take_while(|ch| !ch.is_ascii_alphabetic())
        .count();
    let index = leading + calculate_orp(token);

    index.min(token.chars().count())
}

/// Splits a token into the text before the fixation letter, the letter and
/// the remainder. Tokens without letters come back whole in `before`.
pub fn split_word_by_orp(token: &str) -> OrpSplit<'_> {
    if token.is_empty() {
        return OrpSplit::default();
    }

    let index = orp_char_index(token);
    let Some((start, ch)) = token.char_indices().nth(index) else {
        return OrpSplit {
            before: token,
            focus: "",
            after: "",
        };
    };
    let end = start + ch.len_utf8();

    OrpSplit {
        before: &token[..start],
        focus: &token[start..end],
        after: &token[end..],
    }
}
