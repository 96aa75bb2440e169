//! The automated opponent: move search, the per-game actor, and the
//! actor registry.

pub mod actor;
pub mod registry;
pub mod search;

pub use actor::{spawn_bot, BotConfig, BotHandle, BotSignal};
pub use registry::BotRegistry;
pub use search::{enumerate_moves, BotMove, BotMoveKind, MoveSet};
