//! Optimistic transaction runner.
//!
//! `run` loads the latest snapshot, invokes a pure transition function
//! on it, and commits the result with compare-and-swap. A conflicting
//! concurrent write reloads and replays the whole transition against
//! the fresh snapshot; the transition function must therefore depend on
//! nothing but its input. Retries are bounded and surfaced as
//! `GameError::Contention` when exhausted.

use std::sync::Arc;

use tracing::warn;

use crate::core::{Game, GameId};
use crate::error::{GameError, StoreError};

use super::GameStore;

/// What a transition function asks the runner to do.
#[derive(Clone, Debug)]
pub enum TxnOutcome<T> {
    /// Commit the new state, then return the value.
    Write(Game, T),
    /// Return the value without writing.
    ReadOnly(T),
}

/// Bounded-retry compare-and-swap wrapper around a `GameStore`.
#[derive(Clone)]
pub struct TxnRunner {
    store: Arc<dyn GameStore>,
    max_attempts: usize,
}

impl TxnRunner {
    /// Default retry bound.
    pub const DEFAULT_MAX_ATTEMPTS: usize = 8;

    /// Create a runner with the default retry bound.
    #[must_use]
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self::with_max_attempts(store, Self::DEFAULT_MAX_ATTEMPTS)
    }

    /// Create a runner with an explicit retry bound.
    ///
    /// `max_attempts` must be at least 1.
    #[must_use]
    pub fn with_max_attempts(store: Arc<dyn GameStore>, max_attempts: usize) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Run `transition` against the latest snapshot of `game_id`.
    ///
    /// The transition runs at least once and once per conflict after
    /// that, up to the bound. An absent game aborts immediately with
    /// `GameNotFound`; transition errors abort without a write.
    pub async fn run<T, F>(&self, game_id: &GameId, transition: F) -> Result<T, GameError>
    where
        F: Fn(&Game) -> Result<TxnOutcome<T>, GameError>,
    {
        for attempt in 1..=self.max_attempts {
            let versioned = self
                .store
                .read(game_id)
                .await?
                .ok_or_else(|| GameError::GameNotFound(game_id.clone()))?;

            match transition(&versioned.game)? {
                TxnOutcome::ReadOnly(value) => return Ok(value),
                TxnOutcome::Write(next, value) => {
                    match self
                        .store
                        .compare_and_swap(game_id, Some(versioned.version), &next)
                        .await
                    {
                        Ok(_) => return Ok(value),
                        Err(StoreError::Conflict) => {
                            warn!(game = %game_id, attempt, "write conflict, replaying transition");
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }

        Err(GameError::Contention(self.max_attempts))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::core::{GameConfig, PlayerId};
    use crate::store::{MemoryStore, Version, VersionedGame};

    async fn seeded_store(code: &str) -> (Arc<MemoryStore>, GameId) {
        let store = Arc::new(MemoryStore::new());
        let id = GameId::new(code);
        let game = Game::new(id.clone(), GameConfig::default(), 1);
        store.compare_and_swap(&id, None, &game).await.unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn test_write_commits_and_returns_value() {
        let (store, id) = seeded_store("AB12").await;
        let runner = TxnRunner::new(store.clone());

        let joined = runner
            .run(&id, |game| {
                let next = game.join(PlayerId::new("alice"), "Alice", 1)?;
                let count = next.players.len();
                Ok(TxnOutcome::Write(next, count))
            })
            .await
            .unwrap();

        assert_eq!(joined, 1);
        let stored = store.read(&id).await.unwrap().unwrap();
        assert_eq!(stored.version, Version(2));
        assert_eq!(stored.game.players.len(), 1);
    }

    #[tokio::test]
    async fn test_read_only_does_not_bump_version() {
        let (store, id) = seeded_store("AB12").await;
        let runner = TxnRunner::new(store.clone());

        let tiles = runner
            .run(&id, |game| Ok(TxnOutcome::ReadOnly(game.tiles.len())))
            .await
            .unwrap();

        assert_eq!(tiles, 144);
        assert_eq!(store.read(&id).await.unwrap().unwrap().version, Version(1));
    }

    #[tokio::test]
    async fn test_missing_game_aborts() {
        let runner = TxnRunner::new(Arc::new(MemoryStore::new()));
        let err = runner
            .run(&GameId::new("NOPE"), |_| Ok(TxnOutcome::ReadOnly(())))
            .await;
        assert!(matches!(err, Err(GameError::GameNotFound(_))));
    }

    #[tokio::test]
    async fn test_transition_error_aborts_without_write() {
        let (store, id) = seeded_store("AB12").await;
        let runner = TxnRunner::new(store.clone());

        let err = runner
            .run(&id, |game| {
                // Second join of the same player propagates as an error
                let next = game.join(PlayerId::new("alice"), "Alice", 1)?;
                let next = next.join(PlayerId::new("alice"), "Alice", 2)?;
                Ok(TxnOutcome::Write(next, ()))
            })
            .await;

        assert!(matches!(err, Err(GameError::AlreadyJoined(_))));
        assert_eq!(store.read(&id).await.unwrap().unwrap().version, Version(1));
    }

    /// Store whose writes always conflict, to exhaust the retry bound.
    struct AlwaysConflict {
        reads: AtomicUsize,
        inner: MemoryStore,
    }

    #[async_trait]
    impl GameStore for AlwaysConflict {
        async fn read(&self, id: &GameId) -> Result<Option<VersionedGame>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(id).await
        }

        async fn compare_and_swap(
            &self,
            _id: &GameId,
            _expected: Option<Version>,
            _game: &Game,
        ) -> Result<Version, StoreError> {
            Err(StoreError::Conflict)
        }

        async fn remove(&self, id: &GameId) -> Result<(), StoreError> {
            self.inner.remove(id).await
        }
    }

    #[tokio::test]
    async fn test_conflict_storm_surfaces_contention() {
        let id = GameId::new("AB12");
        let inner = MemoryStore::new();
        inner
            .compare_and_swap(&id, None, &Game::new(id.clone(), GameConfig::default(), 1))
            .await
            .unwrap();
        let store = Arc::new(AlwaysConflict {
            reads: AtomicUsize::new(0),
            inner,
        });

        let runner = TxnRunner::with_max_attempts(store.clone(), 3);
        let err = runner
            .run(&id, |game| Ok(TxnOutcome::Write(game.clone(), ())))
            .await;

        assert!(matches!(err, Err(GameError::Contention(3))));
        // Each attempt reloads a fresh snapshot
        assert_eq!(store.reads.load(Ordering::SeqCst), 3);
    }
}
