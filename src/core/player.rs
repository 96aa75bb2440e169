//! Players and turn ordering.

use serde::{Deserialize, Serialize};

use super::ids::PlayerId;

/// A player in one game.
///
/// `turn_order` is assigned at join time (1-based, join order) and is
/// stable for the game's lifetime; flip-driven turn rotation walks it.
/// `score` may go negative under steal penalties.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Verified identity of the player.
    pub id: PlayerId,

    /// Display name shown to other players.
    pub display_name: String,

    /// Current score. Steal penalties can push this below zero.
    pub score: i32,

    /// Whether this player currently holds the turn.
    pub has_turn: bool,

    /// Stable 1-based position in the flip rotation.
    pub turn_order: u32,
}

impl Player {
    /// Create a player with a zero score and the given turn order.
    pub fn new(id: PlayerId, display_name: impl Into<String>, turn_order: u32) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            score: 0,
            has_turn: false,
            turn_order,
        }
    }
}
