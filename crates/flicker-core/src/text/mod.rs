//! Raw text shaping: whitespace normalization and annotated tokenization.

mod normalize;
mod patterns;
mod tokenizer;

pub use normalize::{count_words, next_word_at, normalize_text, prepare_pasted_text};
pub use tokenizer::{RawWord, clean_word, tokenize_words};
