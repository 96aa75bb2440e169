//! Core game state: identifiers, configuration, players, the action
//! log, deterministic randomness, and the `Game` aggregate itself.

pub mod action;
pub mod config;
pub mod ids;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{ActionKind, ActionRecord, RejectReason, TileIdList};
pub use config::{GameConfig, CLASSIC_LETTER_COUNTS};
pub use ids::{GameId, PlayerId, TileId, WordId};
pub use player::Player;
pub use rng::{GameRng, GameRngState};
pub use state::{Game, GameStatus};
