//! Sorted-letter-key anagram index.
//!
//! Maps each word's letter multiset (represented as its letters sorted
//! ascending, lowercase) to every dictionary word sharing that multiset.
//! The bot looks up tile combinations by key instead of testing every
//! dictionary word against every combination.

use rustc_hash::FxHashMap;

/// Anagram lookup table built once from a word list.
#[derive(Clone, Debug, Default)]
pub struct AnagramIndex {
    entries: FxHashMap<String, Vec<String>>,
}

/// Sorted-lowercase-letter key for a string.
#[must_use]
pub fn anagram_key(text: &str) -> String {
    let mut letters: Vec<char> = text.to_lowercase().chars().collect();
    letters.sort_unstable();
    letters.into_iter().collect()
}

impl AnagramIndex {
    /// Build the index from an iterator of words.
    ///
    /// Words shorter than `min_word_length` letters are excluded; they
    /// can never be submitted.
    pub fn from_words<I, S>(words: I, min_word_length: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: FxHashMap<String, Vec<String>> = FxHashMap::default();
        for word in words {
            let word = word.as_ref().to_lowercase();
            if word.chars().count() < min_word_length {
                continue;
            }
            entries.entry(anagram_key(&word)).or_default().push(word);
        }
        Self { entries }
    }

    /// Words whose letter multiset matches `key`.
    #[must_use]
    pub fn lookup(&self, key: &str) -> &[String] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct letter-multiset keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
