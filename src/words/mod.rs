//! The word ledger: claimed words, ownership, and mutation history.
//!
//! A word's `history` is an append-only audit trail. When a word is
//! improved or stolen, the old word keeps its entry in the ledger with a
//! terminal status and the new word links back through
//! `previous_word`.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, TileId, WordId};

/// Lifecycle status of a ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordStatus {
    /// Live on the board; owns its tiles.
    Valid,
    /// Recorded but never legal (kept for audit).
    Invalid,
    /// Replaced by a longer word from the same owner.
    SupersededByOwner,
    /// Taken by another player.
    Stolen,
}

/// How a word came to be (or ceased to be) in its recorded form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Claimed fresh from middle tiles.
    MiddleClaim,
    /// Extended by its own owner.
    Improvement,
    /// Claimed out of an opponent's word.
    Steal,
}

/// Immutable snapshot of a word at one point in its history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordHistoryEntry {
    /// The text at this point.
    pub text: String,

    /// The tiles at this point, in word order.
    pub tile_ids: Vec<TileId>,

    /// Who owned the word at this point.
    pub owner: PlayerId,

    /// Wall-clock milliseconds supplied by the caller.
    pub timestamp_ms: u64,

    /// The transition that produced this snapshot.
    pub transition: TransitionKind,
}

/// One claimed word.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Ledger id.
    pub id: WordId,

    /// The word's text, uppercase, matching `tile_ids` letter by letter.
    pub text: String,

    /// Tiles composing the word, in text order.
    pub tile_ids: Vec<TileId>,

    /// Lifecycle status.
    pub status: WordStatus,

    /// Current owner.
    pub owner: PlayerId,

    /// The word this one was built from, if any.
    pub previous_word: Option<WordId>,

    /// Append-only audit trail, oldest first.
    pub history: Vec<WordHistoryEntry>,
}

impl Word {
    /// Create a valid word seeded with its first history entry.
    #[must_use]
    pub fn new(
        id: WordId,
        text: String,
        tile_ids: Vec<TileId>,
        owner: PlayerId,
        previous_word: Option<WordId>,
        transition: TransitionKind,
        timestamp_ms: u64,
    ) -> Self {
        let seed = WordHistoryEntry {
            text: text.clone(),
            tile_ids: tile_ids.clone(),
            owner: owner.clone(),
            timestamp_ms,
            transition,
        };
        Self {
            id,
            text,
            tile_ids,
            status: WordStatus::Valid,
            owner,
            previous_word,
            history: vec![seed],
        }
    }

    /// Whether the word is live on the board.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status == WordStatus::Valid
    }

    /// Number of tiles in the word.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tile_ids.len()
    }

    /// Whether the word has no tiles. Never true for a constructed word.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tile_ids.is_empty()
    }

    /// Append a final-state snapshot and move to a terminal status.
    ///
    /// Used when the word is superseded or stolen; the snapshot captures
    /// the word as it stood before the transition.
    pub fn retire(&mut self, status: WordStatus, transition: TransitionKind, timestamp_ms: u64) {
        self.history.push(WordHistoryEntry {
            text: self.text.clone(),
            tile_ids: self.tile_ids.clone(),
            owner: self.owner.clone(),
            timestamp_ms,
            transition,
        });
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word() -> Word {
        Word::new(
            WordId::new(0),
            "CAT".into(),
            vec![TileId(0), TileId(1), TileId(2)],
            PlayerId::new("alice"),
            None,
            TransitionKind::MiddleClaim,
            1000,
        )
    }

    #[test]
    fn test_new_word_seeds_history() {
        let w = word();
        assert!(w.is_valid());
        assert_eq!(w.len(), 3);
        assert_eq!(w.history.len(), 1);
        assert_eq!(w.history[0].text, "CAT");
        assert_eq!(w.history[0].transition, TransitionKind::MiddleClaim);
        assert_eq!(w.previous_word, None);
    }

    #[test]
    fn test_retire_appends_snapshot() {
        let mut w = word();
        w.retire(WordStatus::Stolen, TransitionKind::Steal, 2000);

        assert_eq!(w.status, WordStatus::Stolen);
        assert!(!w.is_valid());
        assert_eq!(w.history.len(), 2);
        assert_eq!(w.history[1].timestamp_ms, 2000);
        assert_eq!(w.history[1].transition, TransitionKind::Steal);
        // The snapshot captures the pre-transition owner
        assert_eq!(w.history[1].owner, PlayerId::new("alice"));
    }
}
