//! In-memory game stores
//!
//! `InMemoryGameStore` backs the `memory` storage backend; `RecordingGameStore`
//! additionally records saves and can inject failures for tests.

use crate::storage::GameStore;
use crate::types::{GameCollection, GameRecord};
use anyhow::anyhow;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Collection held in process memory
#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    games: RwLock<GameCollection>,
}

impl InMemoryGameStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `games`
    pub fn with_games(games: GameCollection) -> Self {
        Self {
            games: RwLock::new(games),
        }
    }

    /// Snapshot of the stored collection
    pub async fn snapshot(&self) -> GameCollection {
        self.games.read().await.clone()
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn load(&self) -> anyhow::Result<GameCollection> {
        Ok(self.games.read().await.clone())
    }

    async fn save(&self, games: &[GameRecord]) -> anyhow::Result<()> {
        *self.games.write().await = games.to_vec();
        Ok(())
    }
}

/// Game store that records saves and injects failures, for testing
#[derive(Debug, Default)]
pub struct RecordingGameStore {
    games: RwLock<GameCollection>,
    saved: RwLock<Vec<GameCollection>>,
    load_calls: AtomicUsize,
    fail_next_load: AtomicBool,
    fail_next_save: AtomicBool,
}

impl RecordingGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset the collection returned by `load`
    pub fn with_games(games: GameCollection) -> Self {
        Self {
            games: RwLock::new(games),
            ..Self::default()
        }
    }

    /// Every collection passed to `save`, oldest first
    pub async fn saved_collections(&self) -> Vec<GameCollection> {
        self.saved.read().await.clone()
    }

    /// Number of `save` calls made
    pub async fn save_count(&self) -> usize {
        self.saved.read().await.len()
    }

    /// Number of `load` calls made
    pub fn load_count(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    /// Make the next `load` fail
    pub fn fail_next_load(&self) {
        self.fail_next_load.store(true, Ordering::SeqCst);
    }

    /// Make the next `save` fail
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl GameStore for RecordingGameStore {
    async fn load(&self) -> anyhow::Result<GameCollection> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_load.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("simulated load failure"));
        }
        Ok(self.games.read().await.clone())
    }

    async fn save(&self, games: &[GameRecord]) -> anyhow::Result<()> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("simulated save failure"));
        }
        self.saved.write().await.push(games.to_vec());
        *self.games.write().await = games.to_vec();
        Ok(())
    }
}
