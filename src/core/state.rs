//! The `Game` aggregate: the single unit of atomicity.
//!
//! Everything a game owns (the letter bag, all tiles, the word ledger,
//! players, the turn, the action log, and the embedded RNG) lives in
//! one `Game` value. State only changes by producing a new `Game`
//! through the transition functions in `rules`, committed through the
//! optimistic transaction runner.
//!
//! Uses `im::Vector` for the append-only action log so snapshot clones
//! stay cheap on long games.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::tiles::{LetterBag, Tile, TileLocation};
use crate::words::Word;

use super::action::ActionRecord;
use super::config::GameConfig;
use super::ids::{GameId, PlayerId, TileId, WordId};
use super::player::Player;
use super::rng::GameRng;

/// Whether the game is still being played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Play continues.
    InProgress,
    /// A player reached the winning score; no further transitions.
    WinnerDeclared {
        /// The winning player.
        winner: PlayerId,
    },
}

/// Complete state of one game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    id: GameId,
    config: GameConfig,

    /// Remaining letter counts for the flip draw.
    pub bag: LetterBag,

    /// All tiles, indexed by `TileId`.
    pub tiles: Vec<Tile>,

    /// The word ledger (valid and retired words).
    pub words: FxHashMap<WordId, Word>,

    /// Players in join order.
    pub players: Vec<Player>,

    current_player: Option<PlayerId>,
    status: GameStatus,

    /// Append-only action log.
    pub actions: Vector<ActionRecord>,

    /// Deterministic randomness for flips and bot decisions.
    pub rng: GameRng,

    next_word_id: u32,
}

impl Game {
    /// Create a game with a full face-down tile allocation and no
    /// players.
    #[must_use]
    pub fn new(id: GameId, config: GameConfig, seed: u64) -> Self {
        let total = config.total_tiles();
        let tiles = (0..total as u32).map(|i| Tile::new(TileId(i))).collect();
        let bag = LetterBag::new(config.letter_counts);

        Self {
            id,
            config,
            bag,
            tiles,
            words: FxHashMap::default(),
            players: Vec::new(),
            current_player: None,
            status: GameStatus::InProgress,
            actions: Vector::new(),
            rng: GameRng::new(seed),
            next_word_id: 0,
        }
    }

    /// The game's join code.
    #[must_use]
    pub fn id(&self) -> &GameId {
        &self.id
    }

    /// The rule parameters fixed at creation.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// Whether a winner has been declared.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::WinnerDeclared { .. })
    }

    /// The player holding the turn, if any player has joined.
    #[must_use]
    pub fn current_player(&self) -> Option<&PlayerId> {
        self.current_player.as_ref()
    }

    // === Players ===

    /// Look up a player.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Look up a player mutably.
    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Add a player, returning the next state.
    ///
    /// Turn order is the join position (1-based) and never changes. The
    /// first player to join receives the turn.
    pub fn join(
        &self,
        id: PlayerId,
        display_name: impl Into<String>,
        timestamp_ms: u64,
    ) -> Result<Game, GameError> {
        if self.is_finished() {
            return Err(GameError::GameFinished(self.id.clone()));
        }
        if self.player(&id).is_some() {
            return Err(GameError::AlreadyJoined(id));
        }

        let mut next = self.clone();
        let turn_order = next.players.len() as u32 + 1;
        next.players.push(Player::new(id.clone(), display_name, turn_order));
        if next.current_player.is_none() {
            next.set_turn(&id);
        }
        next.record_action(ActionRecord::new(
            id,
            timestamp_ms,
            super::action::ActionKind::PlayerJoined { turn_order },
        ));
        Ok(next)
    }

    // === Turn sequencing ===

    /// Give the turn to one player, clearing it from everyone else.
    ///
    /// Accepted word submissions land here: submitting a valid word
    /// takes the turn rather than passing it.
    pub fn set_turn(&mut self, id: &PlayerId) {
        for player in &mut self.players {
            player.has_turn = &player.id == id;
        }
        self.current_player = Some(id.clone());
    }

    /// Rotate the turn to the next player by `turn_order`.
    ///
    /// Called after a tile flip. Wraps from the highest order back to
    /// the lowest.
    pub fn advance_turn_after_flip(&mut self) {
        let current_order = self
            .current_player
            .as_ref()
            .and_then(|id| self.player(id))
            .map(|p| p.turn_order);

        let next = match current_order {
            Some(order) => self
                .players
                .iter()
                .filter(|p| p.turn_order > order)
                .min_by_key(|p| p.turn_order)
                .or_else(|| self.players.iter().min_by_key(|p| p.turn_order)),
            None => self.players.iter().min_by_key(|p| p.turn_order),
        };

        if let Some(next) = next.map(|p| p.id.clone()) {
            self.set_turn(&next);
        }
    }

    // === Tiles ===

    /// Look up a tile.
    pub fn tile(&self, id: TileId) -> Result<&Tile, GameError> {
        self.tiles.get(id.index()).ok_or(GameError::TileNotFound(id))
    }

    /// Look up a tile mutably.
    pub fn tile_mut(&mut self, id: TileId) -> Result<&mut Tile, GameError> {
        self.tiles
            .get_mut(id.index())
            .ok_or(GameError::TileNotFound(id))
    }

    /// Iterate over flipped, unclaimed tiles.
    pub fn middle_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_middle())
    }

    /// Iterate over face-down pool tiles.
    pub fn unflipped_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_unflipped())
    }

    // === Words ===

    /// Look up a word.
    pub fn word(&self, id: WordId) -> Result<&Word, GameError> {
        self.words.get(&id).ok_or(GameError::WordNotFound(id))
    }

    /// Iterate over live words.
    pub fn valid_words(&self) -> impl Iterator<Item = &Word> {
        self.words.values().filter(|w| w.is_valid())
    }

    /// Allocate the next word id.
    pub fn alloc_word_id(&mut self) -> WordId {
        let id = WordId(self.next_word_id);
        self.next_word_id += 1;
        id
    }

    // === Log / lifecycle ===

    /// Append an action record.
    pub fn record_action(&mut self, record: ActionRecord) {
        self.actions.push_back(record);
    }

    /// Declare a winner. The turn is left where it is.
    pub fn declare_winner(&mut self, winner: PlayerId) {
        self.status = GameStatus::WinnerDeclared { winner };
    }

    // === Invariants ===

    /// Verify the tile partition and bag accounting.
    ///
    /// Checks, for the whole aggregate:
    /// - every tile referenced by a valid word exists, is located in
    ///   that word, and carries the letter the word's text claims;
    /// - no tile is referenced by two valid words;
    /// - every tile located in a word is referenced back by a valid
    ///   word;
    /// - pool tiles have no letter, middle and claimed tiles do;
    /// - per letter, bag remainder plus flipped tiles equals the
    ///   initial allocation.
    ///
    /// Transition functions run this before returning a next state.
    pub fn check_tile_partition(&self) -> Result<(), GameError> {
        let mut claimed_by: FxHashMap<TileId, WordId> = FxHashMap::default();

        for word in self.valid_words() {
            if word.text.len() != word.tile_ids.len() {
                return Err(GameError::Inconsistency(format!(
                    "{} text/tile length mismatch",
                    word.id
                )));
            }
            for (expected, &tile_id) in word.text.chars().zip(&word.tile_ids) {
                let tile = self.tile(tile_id).map_err(|_| {
                    GameError::Inconsistency(format!("{} references missing {}", word.id, tile_id))
                })?;
                if tile.location != TileLocation::Word(word.id) {
                    return Err(GameError::Inconsistency(format!(
                        "{} referenced by {} but located at {:?}",
                        tile_id, word.id, tile.location
                    )));
                }
                if tile.letter != Some(expected) {
                    return Err(GameError::Inconsistency(format!(
                        "{} letter {:?} does not match text of {}",
                        tile_id, tile.letter, word.id
                    )));
                }
                if let Some(other) = claimed_by.insert(tile_id, word.id) {
                    return Err(GameError::Inconsistency(format!(
                        "{} claimed by both {} and {}",
                        tile_id, other, word.id
                    )));
                }
            }
        }

        let mut flipped_counts = [0u32; 26];
        for tile in &self.tiles {
            match tile.location {
                TileLocation::Pool => {
                    if tile.letter.is_some() {
                        return Err(GameError::Inconsistency(format!(
                            "pool {} has a letter",
                            tile.id
                        )));
                    }
                }
                TileLocation::Middle | TileLocation::Word(_) => {
                    let letter = tile.letter.ok_or_else(|| {
                        GameError::Inconsistency(format!("flipped {} has no letter", tile.id))
                    })?;
                    let index = crate::tiles::letter_index(letter).ok_or_else(|| {
                        GameError::Inconsistency(format!(
                            "{} carries non-letter {:?}",
                            tile.id, letter
                        ))
                    })?;
                    flipped_counts[index] += 1;

                    if let TileLocation::Word(word_id) = tile.location {
                        if claimed_by.get(&tile.id) != Some(&word_id) {
                            return Err(GameError::Inconsistency(format!(
                                "{} located in {} but not referenced by it",
                                tile.id, word_id
                            )));
                        }
                    }
                }
            }
        }

        for (index, &initial) in self.config.letter_counts.iter().enumerate() {
            let letter = (b'A' + index as u8) as char;
            let remaining = self.bag.remaining(letter);
            if remaining + flipped_counts[index] != initial {
                return Err(GameError::Inconsistency(format!(
                    "bag accounting broken for '{letter}': {remaining} left + {} flipped != {initial}",
                    flipped_counts[index]
                )));
            }
        }

        Ok(())
    }
}
