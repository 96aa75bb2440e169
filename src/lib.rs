//! # carnivore
//!
//! The authoritative rules engine for a real-time multi-player
//! word-stealing tile game: tiles flip from a shared pool into the
//! middle, players claim words from revealed letters, extend their own
//! words, or steal opponents' words by rearranging them into longer
//! ones.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: Classification, application, and flips are
//!    functions over a `Game` snapshot. Every effect lives in the
//!    returned next state.
//!
//! 2. **Optimistic Concurrency**: All mutations commit through a
//!    compare-and-swap transaction runner, so concurrent submissions
//!    against one game serialize without locks. Purity is what makes a
//!    conflicting transition safely replayable.
//!
//! 3. **Deterministic Randomness**: The RNG travels inside the game
//!    state. The same snapshot always flips the same tile and the bot
//!    always derives the same move from it.
//!
//! ## Modules
//!
//! - `core`: Ids, configuration, players, action log, RNG, the `Game` aggregate
//! - `tiles`: Letter tiles, locations, and the weighted letter bag
//! - `words`: The word ledger with ownership and history
//! - `rules`: Classification, transition application, the flip protocol
//! - `dict`: Dictionary predicate and the anagram index
//! - `store`: Versioned persistence and the transaction runner
//! - `engine`: The facade callers talk to
//! - `bot`: Move search, the bot actor, and its registry

pub mod bot;
pub mod core;
pub mod dict;
pub mod engine;
pub mod error;
pub mod rules;
pub mod store;
pub mod tiles;
pub mod words;

// Re-export commonly used types
pub use crate::core::{
    ActionKind, ActionRecord, Game, GameConfig, GameId, GameRng, GameRngState, GameStatus, Player,
    PlayerId, RejectReason, TileId, WordId, CLASSIC_LETTER_COUNTS,
};

pub use crate::bot::{BotConfig, BotRegistry};
pub use crate::dict::{AnagramIndex, Dictionary, WordList};
pub use crate::engine::{FlipReport, GameEngine, SubmissionReport};
pub use crate::error::{GameError, StoreError};
pub use crate::rules::{
    apply_submission, classify, flip_tile, Applied, Classification, FlipOutcome,
};
pub use crate::store::{GameStore, MemoryStore, TxnOutcome, TxnRunner, Version, VersionedGame};
pub use crate::tiles::{LetterBag, Tile, TileLocation};
pub use crate::words::{Word, WordHistoryEntry, WordStatus};
