//! The engine facade.
//!
//! `GameEngine` wires the pure rules to the transactional store and is
//! the surface callers (and the bot actor) talk to. Every mutating
//! operation goes through the transaction runner, so concurrent
//! submissions against one game serialize by compare-and-swap retry.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, instrument};

use crate::core::{Game, GameConfig, GameId, PlayerId, TileId, WordId};
use crate::dict::Dictionary;
use crate::error::{GameError, StoreError};
use crate::rules::{apply_submission, classify, flip_tile, Classification, FlipOutcome};
use crate::store::{GameStore, TxnOutcome, TxnRunner};

/// How many join codes to try before giving up on creation.
const MAX_CODE_ATTEMPTS: usize = 8;

/// Outcome of a word submission, as reported to the caller.
#[derive(Clone, Debug)]
pub struct SubmissionReport {
    /// The final classification, from the snapshot that committed.
    pub classification: Classification,
    /// The created word, when the submission was accepted.
    pub word: Option<WordId>,
    /// The submitter's score after the transition.
    pub score: i32,
}

impl SubmissionReport {
    /// Whether the submission changed the board.
    #[must_use]
    pub fn accepted(&self) -> bool {
        self.classification.is_accepted()
    }
}

/// Outcome of a flip attempt.
#[derive(Clone, Copy, Debug)]
pub struct FlipReport {
    /// The revealed tile and letter, or `None` when nothing was left
    /// to flip.
    pub flipped: Option<(TileId, char)>,
}

/// Rules engine over a transactional game store.
pub struct GameEngine {
    store: Arc<dyn GameStore>,
    txn: TxnRunner,
    dict: Arc<dyn Dictionary>,
}

impl GameEngine {
    /// Create an engine over a store and an injected dictionary.
    #[must_use]
    pub fn new(store: Arc<dyn GameStore>, dict: Arc<dyn Dictionary>) -> Self {
        let txn = TxnRunner::new(store.clone());
        Self { store, txn, dict }
    }

    /// The injected dictionary.
    #[must_use]
    pub fn dictionary(&self) -> Arc<dyn Dictionary> {
        self.dict.clone()
    }

    /// Create a new game under a fresh random join code.
    #[instrument(skip(self, config))]
    pub async fn create_game(&self, config: GameConfig) -> Result<GameId, GameError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let id = GameId::random();
            let game = Game::new(id.clone(), config.clone(), rand::random());
            match self.store.compare_and_swap(&id, None, &game).await {
                Ok(_) => {
                    info!(game = %id, "game created");
                    return Ok(id);
                }
                // Join code already taken; roll another
                Err(StoreError::Conflict) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(GameError::Contention(MAX_CODE_ATTEMPTS))
    }

    /// Add a player to a game.
    #[instrument(skip(self, display_name))]
    pub async fn join_game(
        &self,
        game_id: &GameId,
        player: &PlayerId,
        display_name: &str,
    ) -> Result<(), GameError> {
        let now = now_ms();
        self.txn
            .run(game_id, |game| {
                let next = game.join(player.clone(), display_name, now)?;
                Ok(TxnOutcome::Write(next, ()))
            })
            .await
    }

    /// Classify and apply a word submission.
    ///
    /// Rejected submissions still commit (they append to the action
    /// log) and come back as a non-accepted report, not an error.
    #[instrument(skip(self, tile_ids))]
    pub async fn submit_word(
        &self,
        game_id: &GameId,
        player: &PlayerId,
        tile_ids: &[TileId],
    ) -> Result<SubmissionReport, GameError> {
        let now = now_ms();
        self.txn
            .run(game_id, |game| {
                let classification = classify(game, player, tile_ids, self.dict.as_ref())?;
                let applied = apply_submission(game, player, tile_ids, &classification, now)?;
                let score = applied
                    .game
                    .player(player)
                    .map_or(0, |p| p.score);
                let report = SubmissionReport {
                    classification,
                    word: applied.word,
                    score,
                };
                Ok(TxnOutcome::Write(applied.game, report))
            })
            .await
    }

    /// Attempt a tile flip on behalf of a player.
    #[instrument(skip(self))]
    pub async fn flip_tile(
        &self,
        game_id: &GameId,
        player: &PlayerId,
    ) -> Result<FlipReport, GameError> {
        let now = now_ms();
        self.txn
            .run(game_id, |game| match flip_tile(game, player, now)? {
                FlipOutcome::Flipped { game, tile, letter } => Ok(TxnOutcome::Write(
                    game,
                    FlipReport {
                        flipped: Some((tile, letter)),
                    },
                )),
                FlipOutcome::NoTilesLeft => Ok(TxnOutcome::ReadOnly(FlipReport { flipped: None })),
            })
            .await
    }

    /// Read the latest snapshot of a game.
    pub async fn snapshot(&self, game_id: &GameId) -> Result<Game, GameError> {
        self.store
            .read(game_id)
            .await?
            .map(|v| v.game)
            .ok_or_else(|| GameError::GameNotFound(game_id.clone()))
    }

    /// Delete a game.
    #[instrument(skip(self))]
    pub async fn remove_game(&self, game_id: &GameId) -> Result<(), GameError> {
        self.store.remove(game_id).await?;
        info!(game = %game_id, "game removed");
        Ok(())
    }
}

/// Wall-clock milliseconds since the Unix epoch.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
