//! The bot actor.
//!
//! Each botted game gets one asynchronous actor, off the human request
//! path. The actor wakes on an opponent-move signal, sleeps a bounded
//! random delay so it does not play at machine speed, then searches the
//! live snapshot and submits through the same transactional path humans
//! use. A finished or deleted game stops the actor.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::{GameId, PlayerId};
use crate::dict::AnagramIndex;
use crate::engine::GameEngine;
use crate::error::GameError;

use super::search::enumerate_moves;

/// Bot identity and pacing.
#[derive(Clone, Debug)]
pub struct BotConfig {
    /// Player id the bot joins as.
    pub player: PlayerId,
    /// Display name shown to other players.
    pub display_name: String,
    /// Minimum thinking delay before acting.
    pub min_delay_ms: u64,
    /// Maximum thinking delay before acting.
    pub max_delay_ms: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            player: PlayerId::new("computer"),
            display_name: "Computer".into(),
            min_delay_ms: 1_000,
            max_delay_ms: 8_000,
        }
    }
}

/// Wake-up signals delivered to a bot actor.
#[derive(Clone, Copy, Debug)]
pub enum BotSignal {
    /// Another player moved; take a turn after the thinking delay.
    OpponentMoved,
    /// Tear the actor down.
    Shutdown,
}

/// Channel handle to a running bot actor.
#[derive(Debug)]
pub struct BotHandle {
    tx: mpsc::UnboundedSender<BotSignal>,
    task: JoinHandle<()>,
}

impl BotHandle {
    /// Signal that an opponent moved. A no-op once the actor is gone.
    pub fn notify(&self) {
        let _ = self.tx.send(BotSignal::OpponentMoved);
    }

    /// Stop the actor and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.tx.send(BotSignal::Shutdown);
        let _ = self.task.await;
    }
}

/// Start a bot actor for a game the bot has already joined.
#[must_use]
pub fn spawn_bot(
    engine: Arc<GameEngine>,
    index: Arc<AnagramIndex>,
    game_id: GameId,
    config: BotConfig,
) -> BotHandle {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move {
        while let Some(signal) = rx.recv().await {
            match signal {
                BotSignal::Shutdown => break,
                BotSignal::OpponentMoved => {
                    think(&config).await;
                    match run_cycle(&engine, &index, &game_id, &config).await {
                        Ok(()) => {}
                        Err(GameError::GameNotFound(_) | GameError::GameFinished(_)) => {
                            info!(game = %game_id, "game over, bot retiring");
                            break;
                        }
                        Err(e) => {
                            warn!(game = %game_id, error = %e, "bot cycle failed");
                        }
                    }
                }
            }
        }
    });

    BotHandle { tx, task }
}

/// Sleep the configured random thinking delay.
async fn think(config: &BotConfig) {
    let (min, max) = (
        config.min_delay_ms.min(config.max_delay_ms),
        config.min_delay_ms.max(config.max_delay_ms),
    );
    let delay = rand::thread_rng().gen_range(min..=max);
    tokio::time::sleep(Duration::from_millis(delay)).await;
}

/// One bot turn: submit the chosen move if any, then attempt a flip.
///
/// The move choice is derived from the snapshot's own RNG, so it is a
/// pure function of the board. If the board changes before the
/// submission commits, the transactional path re-classifies it and the
/// stale move comes back rejected rather than corrupting state.
async fn run_cycle(
    engine: &GameEngine,
    index: &AnagramIndex,
    game_id: &GameId,
    config: &BotConfig,
) -> Result<(), GameError> {
    let game = engine.snapshot(game_id).await?;
    if game.is_finished() {
        return Err(GameError::GameFinished(game_id.clone()));
    }

    let moves = enumerate_moves(&game, &config.player, index);
    let mut rng = game.rng.for_context("bot-move");
    if let Some(mv) = moves.choose(&mut rng) {
        let report = engine
            .submit_word(game_id, &config.player, &mv.tile_ids)
            .await?;
        if report.accepted() {
            info!(game = %game_id, word = %mv.text, score = report.score, "bot played a word");
        } else {
            debug!(game = %game_id, word = %mv.text, "bot move went stale before commit");
        }
    }

    engine.flip_tile(game_id, &config.player).await?;
    Ok(())
}
