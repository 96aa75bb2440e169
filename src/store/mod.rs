//! Versioned game persistence.
//!
//! Games are stored as opaque versioned documents behind the
//! `GameStore` trait. Writes are compare-and-swap only; the transaction
//! runner in [`txn`] builds the retry loop on top.

pub mod memory;
pub mod txn;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{Game, GameId};
use crate::error::StoreError;

pub use memory::MemoryStore;
pub use txn::{TxnOutcome, TxnRunner};

/// Monotonic document version, bumped on every successful write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version(pub u64);

/// A game snapshot together with the version it was read at.
#[derive(Clone, Debug)]
pub struct VersionedGame {
    /// Version of the stored document this snapshot was decoded from.
    pub version: Version,
    /// The decoded game.
    pub game: Game,
}

/// Transactional document store for games.
///
/// `compare_and_swap` with `expected = None` creates the document and
/// conflicts if it already exists; with `expected = Some(v)` it
/// replaces the document only if the stored version is still `v`.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Read the current snapshot, or `None` if the game does not exist.
    async fn read(&self, id: &GameId) -> Result<Option<VersionedGame>, StoreError>;

    /// Write `game` if the stored version matches `expected`.
    ///
    /// Returns the new version on success and `StoreError::Conflict`
    /// on a version mismatch.
    async fn compare_and_swap(
        &self,
        id: &GameId,
        expected: Option<Version>,
        game: &Game,
    ) -> Result<Version, StoreError>;

    /// Delete the document. Deleting an absent document is not an error.
    async fn remove(&self, id: &GameId) -> Result<(), StoreError>;
}
