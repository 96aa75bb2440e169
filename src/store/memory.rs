//! In-process game store.
//!
//! Documents are held as encoded bytes under a mutex, so the store
//! exercises the same codec path and version discipline a remote
//! document store would.

use std::sync::Mutex;

use async_trait::async_trait;
use rustc_hash::FxHashMap;

use crate::core::{Game, GameId};
use crate::error::StoreError;

use super::{GameStore, Version, VersionedGame};

/// Mutex-protected map of encoded game documents.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<FxHashMap<GameId, (u64, Vec<u8>)>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FxHashMap<GameId, (u64, Vec<u8>)>> {
        // Lock poisoning means a panic while holding the guard; the map
        // itself is still structurally sound, so keep serving it.
        match self.documents.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn encode(game: &Game) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(game).map_err(|e| StoreError::Codec(e.to_string()))
}

fn decode(bytes: &[u8]) -> Result<Game, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Codec(e.to_string()))
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn read(&self, id: &GameId) -> Result<Option<VersionedGame>, StoreError> {
        let documents = self.lock();
        match documents.get(id) {
            Some((version, bytes)) => Ok(Some(VersionedGame {
                version: Version(*version),
                game: decode(bytes)?,
            })),
            None => Ok(None),
        }
    }

    async fn compare_and_swap(
        &self,
        id: &GameId,
        expected: Option<Version>,
        game: &Game,
    ) -> Result<Version, StoreError> {
        let bytes = encode(game)?;
        let mut documents = self.lock();

        let stored = documents.get(id).map(|(v, _)| Version(*v));
        if stored != expected {
            return Err(StoreError::Conflict);
        }

        let next = expected.map_or(1, |v| v.0 + 1);
        documents.insert(id.clone(), (next, bytes));
        Ok(Version(next))
    }

    async fn remove(&self, id: &GameId) -> Result<(), StoreError> {
        self.lock().remove(id);
        Ok(())
    }
}
