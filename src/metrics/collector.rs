//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the game ranking service
//! using Prometheus metrics.

use crate::types::StatisticsSummary;
use anyhow::Result;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry};
use std::sync::Arc;
use std::time::Duration;

/// Main metrics collector for the ranking service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Ranking-related metrics
    ranking_metrics: RankingMetrics,
}

/// Ranking-related metrics
#[derive(Clone)]
pub struct RankingMetrics {
    /// Total plays recorded
    pub plays_recorded_total: IntCounter,

    /// Mutations by operation and outcome
    pub mutations_total: IntCounterVec,

    /// Storage failures by operation
    pub storage_errors_total: IntCounterVec,

    /// Duration of service operations
    pub operation_duration: HistogramVec,

    /// Games in the collection by state (active/inactive)
    pub games: IntGaugeVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let ranking_metrics = RankingMetrics::new(&registry)?;

        Ok(Self {
            registry,
            ranking_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get ranking metrics
    pub fn ranking(&self) -> &RankingMetrics {
        &self.ranking_metrics
    }

    /// Record a completed play
    pub fn record_play(&self) {
        self.ranking_metrics.plays_recorded_total.inc();
    }

    /// Record a mutation attempt and its outcome
    pub fn record_mutation(&self, operation: &str, status: &str, duration: Duration) {
        self.ranking_metrics
            .mutations_total
            .with_label_values(&[operation, status])
            .inc();

        self.record_operation(operation, duration);
    }

    /// Record the duration of any operation
    pub fn record_operation(&self, operation: &str, duration: Duration) {
        self.ranking_metrics
            .operation_duration
            .with_label_values(&[operation])
            .observe(duration.as_secs_f64());
    }

    /// Record a storage failure
    pub fn record_storage_error(&self, operation: &str) {
        self.ranking_metrics
            .storage_errors_total
            .with_label_values(&[operation])
            .inc();
    }

    /// Update collection gauges from statistics
    pub fn update_from_statistics(&self, stats: &StatisticsSummary) {
        self.ranking_metrics
            .games
            .with_label_values(&["active"])
            .set(stats.active_games as i64);
        self.ranking_metrics
            .games
            .with_label_values(&["inactive"])
            .set(stats.inactive_games as i64);
    }
}

impl RankingMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let plays_recorded_total = IntCounter::new(
            "game_ranking_plays_recorded_total",
            "Total plays recorded",
        )?;
        registry.register(Box::new(plays_recorded_total.clone()))?;

        let mutations_total = IntCounterVec::new(
            Opts::new(
                "game_ranking_mutations_total",
                "Total ranking mutations by operation and outcome",
            ),
            &["operation", "status"],
        )?;
        registry.register(Box::new(mutations_total.clone()))?;

        let storage_errors_total = IntCounterVec::new(
            Opts::new(
                "game_ranking_storage_errors_total",
                "Total storage failures",
            ),
            &["operation"],
        )?;
        registry.register(Box::new(storage_errors_total.clone()))?;

        let operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "game_ranking_operation_duration_seconds",
                "Ranking operation duration in seconds",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["operation"],
        )?;
        registry.register(Box::new(operation_duration.clone()))?;

        let games = IntGaugeVec::new(
            Opts::new("game_ranking_games", "Games in the collection by state"),
            &["state"],
        )?;
        registry.register(Box::new(games.clone()))?;

        Ok(Self {
            plays_recorded_total,
            mutations_total,
            storage_errors_total,
            operation_duration,
            games,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::new().unwrap();
        collector.record_play();
        collector.record_mutation("record_play", "success", Duration::from_millis(2));

        assert_eq!(collector.ranking().plays_recorded_total.get(), 1);
        assert_eq!(
            collector
                .ranking()
                .mutations_total
                .with_label_values(&["record_play", "success"])
                .get(),
            1
        );
    }

    #[test]
    fn test_update_from_statistics() {
        let collector = MetricsCollector::new().unwrap();
        collector.update_from_statistics(&StatisticsSummary {
            total_games: 5,
            active_games: 3,
            inactive_games: 2,
            total_plays: 10,
            most_played: None,
            average_plays: 2,
        });

        let games = &collector.ranking().games;
        assert_eq!(games.with_label_values(&["active"]).get(), 3);
        assert_eq!(games.with_label_values(&["inactive"]).get(), 2);
    }

    #[test]
    fn test_registry_exposes_families() {
        let collector = MetricsCollector::new().unwrap();
        collector.record_storage_error("save");
        let families = collector.registry().gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "game_ranking_storage_errors_total"));
    }
}
