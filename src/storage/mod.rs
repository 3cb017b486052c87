//! Storage collaborators for the game collection
//!
//! The collection is persisted as one JSON document that is read and
//! replaced wholesale. There is no transaction or version token, so two
//! overlapping read-modify-write sequences resolve as last write wins.

pub mod file;
pub mod memory;

pub use file::JsonFileGameStore;
pub use memory::{InMemoryGameStore, RecordingGameStore};

use crate::types::{GameCollection, GameRecord};
use async_trait::async_trait;

/// Whole-collection load/save contract
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Fetch the current collection; empty when nothing was ever stored
    async fn load(&self) -> anyhow::Result<GameCollection>;

    /// Replace the stored collection
    async fn save(&self, games: &[GameRecord]) -> anyhow::Result<()>;
}
