//! The tile-flip draw protocol.
//!
//! A flip picks one face-down tile uniformly at random, draws it a
//! letter weighted by the bag's remaining counts, moves the tile to the
//! middle, and rotates the turn. An exhausted pool or bag makes the
//! flip a no-op outcome rather than an error.

use tracing::debug;

use crate::core::{ActionKind, ActionRecord, Game, PlayerId, TileId};
use crate::error::GameError;
use crate::tiles::TileLocation;

/// Result of a flip attempt.
#[derive(Clone, Debug)]
pub enum FlipOutcome {
    /// A tile was revealed.
    Flipped {
        /// The next game state.
        game: Game,
        /// The tile that was flipped.
        tile: TileId,
        /// The letter it received.
        letter: char,
    },
    /// Pool or bag exhausted; no state change.
    NoTilesLeft,
}

/// Flip one tile from the pool into the middle.
///
/// Pure apart from advancing the RNG carried inside the returned state;
/// the same snapshot always flips the same tile and letter.
pub fn flip_tile(
    game: &Game,
    player: &PlayerId,
    timestamp_ms: u64,
) -> Result<FlipOutcome, GameError> {
    if game.is_finished() {
        return Err(GameError::GameFinished(game.id().clone()));
    }
    if game.player(player).is_none() {
        return Err(GameError::PlayerNotFound(player.clone()));
    }

    let unflipped: Vec<TileId> = game.unflipped_tiles().map(|t| t.id).collect();
    if unflipped.is_empty() || game.bag.is_empty() {
        debug!(game = %game.id(), %player, "flip requested with nothing left to flip");
        return Ok(FlipOutcome::NoTilesLeft);
    }

    let mut next = game.clone();
    let index = next.rng.gen_range_usize(0..unflipped.len());
    let tile_id = unflipped[index];

    let letter = next
        .bag
        .draw(&mut next.rng)
        .ok_or_else(|| GameError::Inconsistency("bag emptied mid-flip".into()))?;

    let tile = next.tile_mut(tile_id)?;
    tile.letter = Some(letter);
    tile.location = TileLocation::Middle;

    next.record_action(ActionRecord::new(
        player.clone(),
        timestamp_ms,
        ActionKind::TileFlipped {
            tile: tile_id,
            letter,
        },
    ));
    next.advance_turn_after_flip();
    next.check_tile_partition()?;

    Ok(FlipOutcome::Flipped {
        game: next,
        tile: tile_id,
        letter,
    })
}
