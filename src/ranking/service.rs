//! Ranking service: load → transform → save over a game store
//!
//! Each mutation loads the whole collection, runs one pure engine operation
//! and writes the result back. No lock is held across that sequence, so
//! overlapping mutations resolve as last write wins.

use crate::error::{RankingError, Result};
use crate::metrics::MetricsCollector;
use crate::ranking::engine::RankingEngine;
use crate::storage::GameStore;
use crate::types::{
    GameCollection, GameRecord, Mutation, PlayOutcome, RankedListOptions, StatisticsSummary,
    StatusOutcome,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Ranking operations backed by a game store
#[derive(Clone)]
pub struct RankingService {
    store: Arc<dyn GameStore>,
    engine: RankingEngine,
    metrics_collector: Option<Arc<MetricsCollector>>,
}

impl RankingService {
    /// Create a new ranking service over `store`
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            store,
            engine: RankingEngine::new(),
            metrics_collector: None,
        }
    }

    /// Attach a metrics collector
    pub fn with_metrics(mut self, metrics_collector: Arc<MetricsCollector>) -> Self {
        self.metrics_collector = Some(metrics_collector);
        self
    }

    /// Replace the engine (e.g. one with a fixed clock)
    pub fn with_engine(mut self, engine: RankingEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn engine(&self) -> &RankingEngine {
        &self.engine
    }

    /// Count one play of `game_id`
    pub async fn record_play(&self, game_id: &str) -> Result<PlayOutcome> {
        let engine = self.engine;
        let outcome = self
            .mutate("record_play", game_id, |games| engine.record_play(games, game_id))
            .await?;

        if let Some(metrics) = &self.metrics_collector {
            metrics.record_play();
        }
        Ok(outcome)
    }

    /// Activate or deactivate `game_id`
    pub async fn set_active_status(&self, game_id: &str, is_active: bool) -> Result<StatusOutcome> {
        let engine = self.engine;
        self.mutate("set_active_status", game_id, |games| {
            engine.set_active_status(games, game_id, is_active)
        })
        .await
    }

    /// Pin `game_id` to `rank`
    pub async fn set_manual_rank(&self, game_id: &str, rank: i64) -> Result<StatusOutcome> {
        let engine = self.engine;
        self.mutate("set_manual_rank", game_id, |games| {
            engine.set_manual_rank(games, game_id, rank)
        })
        .await
    }

    /// Return `game_id` to automatic ranking
    pub async fn clear_manual_rank(&self, game_id: &str) -> Result<StatusOutcome> {
        let engine = self.engine;
        self.mutate("clear_manual_rank", game_id, |games| {
            engine.clear_manual_rank(games, game_id)
        })
        .await
    }

    /// Add a newly created game to the ranked collection
    pub async fn register_game(&self, record: GameRecord) -> Result<GameRecord> {
        let engine = self.engine;
        let game_id = record.id.clone();
        self.mutate("register_game", &game_id, |games| {
            engine.register_game(games, record)
        })
        .await
    }

    /// Remove `game_id` from the ranked collection
    pub async fn remove_game(&self, game_id: &str) -> Result<GameRecord> {
        let engine = self.engine;
        self.mutate("remove_game", game_id, |games| {
            engine.remove_game(games, game_id)
        })
        .await
    }

    /// Best ranked `limit` games
    pub async fn top_games(&self, limit: usize, active_only: bool) -> Result<Vec<GameRecord>> {
        let engine = self.engine;
        self.read("top_games", |games| {
            engine.top_games(games, limit, active_only)
        })
        .await
    }

    /// Whole collection ordered per `options`
    pub async fn all_ranked(&self, options: RankedListOptions) -> Result<Vec<GameRecord>> {
        let engine = self.engine;
        self.read("all_ranked", |games| engine.all_ranked(games, options))
            .await
    }

    /// Aggregate numbers over the collection
    pub async fn statistics(&self) -> Result<StatisticsSummary> {
        let engine = self.engine;
        let stats = self
            .read("statistics", |games| engine.statistics(games))
            .await?;

        if let Some(metrics) = &self.metrics_collector {
            metrics.update_from_statistics(&stats);
        }
        Ok(stats)
    }

    /// Load the collection, mapping failures to `StorageFailure`
    pub async fn load(&self) -> Result<GameCollection> {
        self.store.load().await.map_err(|e| {
            error!("Failed to load game collection: {:#}", e);
            self.record_storage_error("load");
            RankingError::storage("load", e)
        })
    }

    async fn save(&self, games: &[GameRecord]) -> Result<()> {
        self.store.save(games).await.map_err(|e| {
            error!("Failed to save game collection: {:#}", e);
            self.record_storage_error("save");
            RankingError::storage("save", e)
        })
    }

    async fn mutate<T, F>(&self, operation: &'static str, game_id: &str, apply: F) -> Result<T>
    where
        F: FnOnce(GameCollection) -> Result<Mutation<T>>,
    {
        let start_time = Instant::now();

        let result: Result<T> = async {
            let games = self.load().await?;
            let Mutation {
                outcome,
                collection,
            } = apply(games)?;
            self.save(&collection).await?;
            Ok(outcome)
        }
        .await;

        let elapsed = start_time.elapsed();
        match &result {
            Ok(_) => info!(
                "{} succeeded - game: '{}', time: {:.2}ms",
                operation,
                game_id,
                elapsed.as_secs_f64() * 1000.0
            ),
            Err(e @ RankingError::StorageFailure { .. }) => error!(
                "{} failed - game: '{}', time: {:.2}ms, error: {}",
                operation,
                game_id,
                elapsed.as_secs_f64() * 1000.0,
                e
            ),
            Err(e) => warn!("{} rejected - game: '{}': {}", operation, game_id, e),
        }

        if let Some(metrics) = &self.metrics_collector {
            let status = match &result {
                Ok(_) => "success",
                Err(e) => e.kind(),
            };
            metrics.record_mutation(operation, status, elapsed);
        }

        result
    }

    async fn read<T, F>(&self, operation: &'static str, query: F) -> Result<T>
    where
        F: FnOnce(&[GameRecord]) -> T,
    {
        let start_time = Instant::now();
        let games = self.load().await?;
        let result = query(&games);

        if let Some(metrics) = &self.metrics_collector {
            metrics.record_operation(operation, start_time.elapsed());
        }
        Ok(result)
    }

    fn record_storage_error(&self, operation: &str) {
        if let Some(metrics) = &self.metrics_collector {
            metrics.record_storage_error(operation);
        }
    }
}
