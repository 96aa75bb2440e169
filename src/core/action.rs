//! The append-only action log.
//!
//! Every accepted or rejected submission, every tile flip, and every
//! join is recorded as an `ActionRecord`. Records are immutable once
//! appended and exist for replay and audit; the engine never reads them
//! back to make decisions.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ids::{PlayerId, TileId, WordId};

/// Tile id list stored inline for typical word lengths.
pub type TileIdList = SmallVec<[TileId; 8]>;

/// Why a submission was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Fewer tiles than the minimum word length.
    TooShort,
    /// No middle tile consumed.
    NoMiddleTile,
    /// A tile was not legally usable (unflipped, or part of a word not
    /// fully subsumed by the submission).
    LetterNotAvailable,
    /// The assembled word failed the dictionary test.
    NotInDictionary,
    /// The classifier could not resolve a category; see
    /// `Classification::Indeterminate`.
    Indeterminate,
}

/// A single entry in the game's action log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player that performed (or attempted) the action.
    pub player: PlayerId,

    /// Wall-clock milliseconds supplied by the caller.
    pub timestamp_ms: u64,

    /// What happened.
    pub kind: ActionKind,
}

/// The kinds of actions the log records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// A player joined and received a turn order slot.
    PlayerJoined {
        /// The 1-based rotation slot assigned at join time.
        turn_order: u32,
    },

    /// A tile was flipped from the pool into the middle.
    TileFlipped {
        /// The tile that was revealed.
        tile: TileId,
        /// The letter drawn from the bag.
        letter: char,
    },

    /// A new word was claimed entirely from middle tiles.
    MiddleWordClaimed {
        /// Id of the created word.
        word: WordId,
        /// The claimed text.
        text: String,
        /// Tiles consumed, in word order.
        tile_ids: TileIdList,
    },

    /// A player extended their own word.
    WordImproved {
        /// Id of the new word.
        word: WordId,
        /// The superseded word.
        previous: WordId,
        /// The new text.
        text: String,
        /// Tiles of the new word, in word order.
        tile_ids: TileIdList,
        /// How many tiles were newly added (the score credit).
        added: u32,
    },

    /// A player stole an opponent's word.
    WordStolen {
        /// Id of the new word.
        word: WordId,
        /// The primary stolen word.
        previous: WordId,
        /// Owner the word was taken from.
        robbed: PlayerId,
        /// The new text.
        text: String,
        /// Tiles of the new word, in word order.
        tile_ids: TileIdList,
        /// Points deducted from the robbed player.
        penalty: u32,
    },

    /// A submission was rejected. No state other than this log entry
    /// changed.
    SubmissionRejected {
        /// Why the submission was rejected.
        reason: RejectReason,
        /// The tiles that were submitted.
        tile_ids: TileIdList,
        /// Best-effort text of the attempt (absent if a tile had no
        /// letter yet).
        text: Option<String>,
    },
}

impl ActionRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(player: PlayerId, timestamp_ms: u64, kind: ActionKind) -> Self {
        Self {
            player,
            timestamp_ms,
            kind,
        }
    }

    /// Whether this record describes an accepted word submission.
    #[must_use]
    pub fn is_accepted_submission(&self) -> bool {
        matches!(
            self.kind,
            ActionKind::MiddleWordClaimed { .. }
                | ActionKind::WordImproved { .. }
                | ActionKind::WordStolen { .. }
        )
    }
}
