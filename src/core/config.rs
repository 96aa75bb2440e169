//! Game configuration.
//!
//! A `GameConfig` fixes the rule parameters for one game at creation
//! time: minimum word length, winning score threshold, and the letter
//! distribution the bag is seeded from. The engine never hardcodes these
//! outside the defaults here.

use serde::{Deserialize, Serialize};

/// The classic 144-tile letter distribution.
///
/// Index 0 is 'A', index 25 is 'Z'.
pub const CLASSIC_LETTER_COUNTS: [u32; 26] = [
    13, // A
    3,  // B
    3,  // C
    6,  // D
    18, // E
    3,  // F
    4,  // G
    3,  // H
    12, // I
    2,  // J
    2,  // K
    5,  // L
    3,  // M
    8,  // N
    11, // O
    3,  // P
    2,  // Q
    9,  // R
    6,  // S
    9,  // T
    6,  // U
    3,  // V
    3,  // W
    2,  // X
    3,  // Y
    2,  // Z
];

/// Rule parameters for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Minimum tile count for any submission.
    pub min_word_length: usize,

    /// Per-player score threshold that declares a winner.
    pub win_score: i32,

    /// Initial letter allocation, indexed 'A'..='Z'.
    pub letter_counts: [u32; 26],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_word_length: 3,
            win_score: 50,
            letter_counts: CLASSIC_LETTER_COUNTS,
        }
    }
}

impl GameConfig {
    /// Create a configuration with the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum word length.
    #[must_use]
    pub fn with_min_word_length(mut self, len: usize) -> Self {
        self.min_word_length = len;
        self
    }

    /// Set the winning score threshold.
    #[must_use]
    pub fn with_win_score(mut self, score: i32) -> Self {
        self.win_score = score;
        self
    }

    /// Replace the letter distribution.
    ///
    /// Tests use this to build small, fully predictable bags.
    #[must_use]
    pub fn with_letter_counts(mut self, counts: [u32; 26]) -> Self {
        self.letter_counts = counts;
        self
    }

    /// Total number of tiles the distribution allocates.
    #[must_use]
    pub fn total_tiles(&self) -> usize {
        self.letter_counts.iter().map(|&c| c as usize).sum()
    }
}
