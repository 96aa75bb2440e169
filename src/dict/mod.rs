//! Dictionary membership and the anagram index.
//!
//! The engine never ships a word list; callers inject a `Dictionary`
//! implementation. `WordList` is the obvious set-backed implementation,
//! and `AnagramIndex` is the sorted-letter-key lookup structure the bot
//! searches with.

pub mod anagram;

use std::collections::HashSet;

pub use anagram::AnagramIndex;

/// Word-membership predicate.
///
/// Implementations must treat lookups case-insensitively; the engine
/// normalizes candidate strings to lowercase before calling `is_word`.
pub trait Dictionary: Send + Sync {
    /// Whether `word` (lowercase) is a playable word.
    fn is_word(&self, word: &str) -> bool;
}

/// Set-backed dictionary built from a word list.
#[derive(Clone, Debug, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Build from an iterator of words; entries are lowercased.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Number of words in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    fn is_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}
