//! Letter tiles and their locations.

use serde::{Deserialize, Serialize};

use crate::core::{TileId, WordId};

/// Where a tile currently lives.
///
/// Every tile is in exactly one location; the `Game` aggregate checks
/// the full partition after every transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileLocation {
    /// Face down in the shared pool, no letter assigned yet.
    Pool,
    /// Flipped into the middle, unclaimed.
    Middle,
    /// Claimed by a valid word.
    Word(WordId),
}

/// One letter tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Dense id, also the tile's index in the game's tile vector.
    pub id: TileId,

    /// Letter ('A'..='Z'), assigned when the tile is flipped.
    pub letter: Option<char>,

    /// Current location.
    pub location: TileLocation,
}

impl Tile {
    /// Create an unflipped pool tile.
    #[must_use]
    pub fn new(id: TileId) -> Self {
        Self {
            id,
            letter: None,
            location: TileLocation::Pool,
        }
    }

    /// Whether the tile is flipped and unclaimed.
    #[must_use]
    pub fn is_middle(&self) -> bool {
        self.location == TileLocation::Middle
    }

    /// Whether the tile is still face down in the pool.
    #[must_use]
    pub fn is_unflipped(&self) -> bool {
        self.location == TileLocation::Pool
    }
}
