//! Registry of running bot actors.
//!
//! Owns one `BotHandle` per botted game so callers can wake a game's
//! bot after a human move and tear it down when the game ends. The
//! registry is plain owned state; callers share it behind an `Arc`.

use rustc_hash::FxHashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::core::GameId;
use crate::dict::AnagramIndex;
use crate::engine::GameEngine;
use crate::error::GameError;

use super::actor::{spawn_bot, BotConfig, BotHandle};

/// One bot actor per game.
pub struct BotRegistry {
    engine: Arc<GameEngine>,
    index: Arc<AnagramIndex>,
    bots: Mutex<FxHashMap<GameId, BotHandle>>,
}

impl BotRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(engine: Arc<GameEngine>, index: Arc<AnagramIndex>) -> Self {
        Self {
            engine,
            index,
            bots: Mutex::new(FxHashMap::default()),
        }
    }

    /// Join the bot player into the game and start its actor.
    ///
    /// Replaces (and tears down) any actor already registered for the
    /// game.
    pub async fn spawn(&self, game_id: &GameId, config: BotConfig) -> Result<(), GameError> {
        self.engine
            .join_game(game_id, &config.player, &config.display_name)
            .await?;

        let handle = spawn_bot(
            self.engine.clone(),
            self.index.clone(),
            game_id.clone(),
            config,
        );
        let previous = self.bots.lock().await.insert(game_id.clone(), handle);
        if let Some(previous) = previous {
            previous.shutdown().await;
        }
        info!(game = %game_id, "bot spawned");
        Ok(())
    }

    /// Wake the game's bot after a human move, if one is registered.
    pub async fn notify_move(&self, game_id: &GameId) {
        if let Some(handle) = self.bots.lock().await.get(game_id) {
            handle.notify();
        }
    }

    /// Tear down the game's bot actor, if any.
    pub async fn shutdown(&self, game_id: &GameId) {
        let handle = self.bots.lock().await.remove(game_id);
        if let Some(handle) = handle {
            handle.shutdown().await;
            info!(game = %game_id, "bot shut down");
        }
    }

    /// Tear down every registered actor.
    pub async fn shutdown_all(&self) {
        let handles: Vec<_> = {
            let mut bots = self.bots.lock().await;
            bots.drain().collect()
        };
        for (_, handle) in handles {
            handle.shutdown().await;
        }
    }
}
