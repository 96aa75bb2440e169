//! Typed identifiers for games, players, tiles, and words.
//!
//! Tiles and words use dense integer ids allocated by the `Game`
//! aggregate; players and games carry externally supplied string ids
//! (player ids come from the identity layer, game ids are short join
//! codes).

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Unique identifier for a letter tile.
///
/// Tile ids are dense: a game with N tiles uses ids `0..N`, so a
/// `TileId` doubles as an index into the game's tile vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl TileId {
    /// Create a new tile ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the tile's index into the game's tile vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// Unique identifier for a claimed word.
///
/// Allocated monotonically by the `Game` aggregate; superseded and
/// stolen words keep their ids so lineage links stay resolvable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordId(pub u32);

impl WordId {
    /// Create a new word ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Word({})", self.0)
    }
}

/// Verified player identity, supplied by the caller's identity layer.
///
/// The engine treats player ids as opaque; equality is the only
/// operation it relies on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a player ID from a verified identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Short alphanumeric game join code.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(String);

/// Alphabet used for generated game codes.
const GAME_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated game codes.
const GAME_CODE_LEN: usize = 4;

impl GameId {
    /// Create a game ID from an existing code.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random 4-character join code.
    #[must_use]
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let code: String = (0..GAME_CODE_LEN)
            .map(|_| GAME_CODE_CHARSET[rng.gen_range(0..GAME_CODE_CHARSET.len())] as char)
            .collect();
        Self(code)
    }

    /// Get the raw code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
