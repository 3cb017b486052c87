//! Test fixtures and store implementations for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use game_ranking::ranking::recalculate;
use game_ranking::storage::{GameStore, InMemoryGameStore};
use game_ranking::types::{GameCollection, GameRecord};
use std::sync::Arc;

/// Fixed reference time for deterministic timestamps
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Active, unranked game with `plays` plays
pub fn game(id: &str, plays: u64) -> GameRecord {
    let mut record = GameRecord::new(id, format!("Game {}", id));
    record.slug = id.to_lowercase();
    record.category = "arcade".to_string();
    record.play_count = plays;
    record
}

/// Game last played `minutes` after the reference time
pub fn game_played_at(id: &str, plays: u64, minutes: i64) -> GameRecord {
    let mut record = game(id, plays);
    record.last_played = Some(base_time() + Duration::minutes(minutes));
    record
}

/// Inactive game
pub fn inactive_game(id: &str, plays: u64) -> GameRecord {
    let mut record = game(id, plays);
    record.is_active = false;
    record
}

/// Collection ranked the way the service would have stored it
pub fn ranked_collection(games: Vec<GameRecord>) -> GameCollection {
    recalculate(games)
}

/// Find a game by id, panicking when absent
pub fn find<'a>(games: &'a [GameRecord], id: &str) -> &'a GameRecord {
    games
        .iter()
        .find(|g| g.id == id)
        .unwrap_or_else(|| panic!("game {} missing", id))
}

/// Store that yields between reading and returning, so overlapping
/// read-modify-write sequences interleave
pub struct SlowGameStore {
    inner: InMemoryGameStore,
    load_delay_ms: u64,
}

impl SlowGameStore {
    pub fn new(games: GameCollection, load_delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryGameStore::with_games(games),
            load_delay_ms,
        })
    }

    pub async fn snapshot(&self) -> GameCollection {
        self.inner.snapshot().await
    }
}

#[async_trait]
impl GameStore for SlowGameStore {
    async fn load(&self) -> anyhow::Result<GameCollection> {
        let games = self.inner.load().await?;
        tokio::time::sleep(tokio::time::Duration::from_millis(self.load_delay_ms)).await;
        Ok(games)
    }

    async fn save(&self, games: &[GameRecord]) -> anyhow::Result<()> {
        self.inner.save(games).await
    }
}
