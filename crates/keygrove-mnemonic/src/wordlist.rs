//! The fixed 2048-word English dictionary.
//!
//! Loaded once per process into an immutable table; concurrency-safe by
//! virtue of never being mutated after initialization.

use std::collections::HashMap;
use std::sync::LazyLock;

const ENGLISH_RAW: &str = include_str!("wordlist/english.txt");

/// Number of entries the dictionary must have: one per 11-bit index.
pub(crate) const WORDLIST_LEN: usize = 2048;

struct Wordlist {
    words: Vec<&'static str>,
    index: HashMap<&'static str, u16>,
}

static ENGLISH: LazyLock<Wordlist> = LazyLock::new(|| {
    let words: Vec<&'static str> = ENGLISH_RAW.split_whitespace().collect();
    assert_eq!(words.len(), WORDLIST_LEN, "embedded wordlist is corrupt");
    let index = words
        .iter()
        .enumerate()
        .map(|(i, &w)| (w, i as u16))
        .collect();
    Wordlist { words, index }
});

/// The word at an 11-bit index.
pub(crate) fn word_at(index: u16) -> &'static str {
    ENGLISH.words[index as usize]
}

/// The 11-bit index of a word, or `None` if it is not in the dictionary.
pub(crate) fn index_of(word: &str) -> Option<u16> {
    ENGLISH.index.get(word).copied()
}
