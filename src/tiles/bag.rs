//! The letter bag: remaining counts per letter.
//!
//! The bag holds how many of each letter are still undrawn. Flipping a
//! tile draws a letter with probability proportional to its remaining
//! count, then decrements it: a draw-without-replacement distribution
//! implemented as a stateful weight table rather than a shuffled
//! multiset.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// Remaining letter counts, indexed 'A'..='Z'.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterBag {
    counts: [u32; 26],
}

/// Map an uppercase ASCII letter to its bag index.
#[must_use]
pub fn letter_index(letter: char) -> Option<usize> {
    if letter.is_ascii_uppercase() {
        Some(letter as usize - 'A' as usize)
    } else {
        None
    }
}

/// Map a bag index back to its uppercase letter.
fn index_letter(index: usize) -> char {
    debug_assert!(index < 26);
    (b'A' + index as u8) as char
}

impl LetterBag {
    /// Create a bag from an initial allocation.
    #[must_use]
    pub fn new(counts: [u32; 26]) -> Self {
        Self { counts }
    }

    /// Remaining count for one letter.
    #[must_use]
    pub fn remaining(&self, letter: char) -> u32 {
        letter_index(letter).map_or(0, |i| self.counts[i])
    }

    /// Total letters left in the bag.
    #[must_use]
    pub fn total_remaining(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Whether every count has reached zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Draw a letter weighted by remaining counts and decrement it.
    ///
    /// Returns `None` when the bag is empty.
    pub fn draw(&mut self, rng: &mut GameRng) -> Option<char> {
        let index = rng.choose_weighted(&self.counts)?;
        self.counts[index] -= 1;
        Some(index_letter(index))
    }
}
