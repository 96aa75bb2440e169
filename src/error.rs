//! Error taxonomy for the rules engine.
//!
//! Four distinct failure classes flow through `GameError`:
//! - **Validation errors** (malformed input: unknown/duplicate tile ids,
//!   unknown players): the caller's fault, reported synchronously.
//! - **Not-found** (game/word/tile absent): fatal to the operation,
//!   never retried.
//! - **Concurrency** (`Contention`): surfaced after the transaction
//!   runner exhausts its bounded retries.
//! - **Invariant violations** (`Inconsistency`): the transition is
//!   aborted rather than committing a corrupted state.
//!
//! Game-rule rejections (word too short, not in dictionary, ...) are NOT
//! errors: they are ordinary `Classification` values recorded in the
//! action log.

use thiserror::Error;

use crate::core::{GameId, PlayerId, TileId, WordId};

/// Errors produced by game operations.
#[derive(Debug, Error)]
pub enum GameError {
    /// The referenced game does not exist in the store.
    #[error("game {0} not found")]
    GameNotFound(GameId),

    /// A submitted tile id does not exist in the game.
    #[error("tile {0} not found in game")]
    TileNotFound(TileId),

    /// A referenced word does not exist in the game.
    #[error("word {0} not found in game")]
    WordNotFound(WordId),

    /// The acting player has not joined the game.
    #[error("player {0} is not in the game")]
    PlayerNotFound(PlayerId),

    /// The same tile id appears more than once in one submission.
    #[error("tile {0} used twice in one submission")]
    DuplicateTile(TileId),

    /// A player attempted to join a game they are already in.
    #[error("player {0} already joined")]
    AlreadyJoined(PlayerId),

    /// The game has a declared winner; no further transitions are legal.
    #[error("game {0} is finished")]
    GameFinished(GameId),

    /// Compare-and-swap kept failing; the caller may retry later.
    #[error("write conflict persisted after {0} attempts")]
    Contention(usize),

    /// Storage layer failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A state invariant did not hold; the transition was aborted.
    #[error("internal consistency violation: {0}")]
    Inconsistency(String),
}

/// Errors produced by the transactional document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The expected version did not match the stored version.
    #[error("version conflict")]
    Conflict,

    /// The document could not be encoded or decoded.
    #[error("codec failure: {0}")]
    Codec(String),
}
