//! Health check functionality
//!
//! Readiness means the game store can be loaded; the report also carries
//! collection counts for operators.

use crate::ranking::RankingService;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error};

/// Health check status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "✅ healthy"),
            HealthStatus::Unhealthy => write!(f, "❌ unhealthy"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
    /// Collection statistics, absent when the store is unreachable
    pub stats: Option<CollectionStats>,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    pub name: String,
    pub status: HealthStatus,
    /// Optional error message if unhealthy
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Collection numbers for health reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub total_games: usize,
    pub active_games: usize,
    pub total_plays: u64,
}

impl HealthCheck {
    /// Check that the game store answers and report collection numbers
    pub async fn check(service: &RankingService, service_name: &str) -> Self {
        let start_time = Instant::now();

        let (store_check, stats) = match service.load().await {
            Ok(games) => {
                let summary = service.engine().statistics(&games);
                (
                    ComponentCheck {
                        name: "game_store".to_string(),
                        status: HealthStatus::Healthy,
                        message: None,
                        duration_ms: start_time.elapsed().as_millis() as u64,
                    },
                    Some(CollectionStats {
                        total_games: summary.total_games,
                        active_games: summary.active_games,
                        total_plays: summary.total_plays,
                    }),
                )
            }
            Err(e) => {
                error!("Game store health check failed: {:#}", e);
                (
                    ComponentCheck {
                        name: "game_store".to_string(),
                        status: HealthStatus::Unhealthy,
                        message: Some("Game store unavailable".to_string()),
                        duration_ms: start_time.elapsed().as_millis() as u64,
                    },
                    None,
                )
            }
        };

        debug!(
            "Health check completed in {}ms: {}",
            store_check.duration_ms, store_check.status
        );

        HealthCheck {
            status: store_check.status,
            service: service_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            checks: vec![store_check],
            stats,
        }
    }

    /// Readiness: the store can be loaded
    pub async fn readiness_check(service: &RankingService) -> HealthStatus {
        match service.load().await {
            Ok(_) => HealthStatus::Healthy,
            Err(_) => HealthStatus::Unhealthy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RecordingGameStore;
    use crate::types::GameRecord;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_healthy_store() {
        let mut game = GameRecord::new("a", "A");
        game.play_count = 3;
        let store = Arc::new(RecordingGameStore::with_games(vec![game]));
        let service = RankingService::new(store);

        let health = HealthCheck::check(&service, "game-ranking").await;

        assert_eq!(health.status, HealthStatus::Healthy);
        let stats = health.stats.unwrap();
        assert_eq!(stats.total_games, 1);
        assert_eq!(stats.total_plays, 3);
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let store = Arc::new(RecordingGameStore::new());
        store.fail_next_load();
        let service = RankingService::new(store.clone());

        let health = HealthCheck::check(&service, "game-ranking").await;

        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert!(health.stats.is_none());
        assert_eq!(
            health.checks[0].message.as_deref(),
            Some("Game store unavailable")
        );
        let body = serde_json::to_string(&health).unwrap();
        assert!(!body.contains("simulated load failure"));
        assert_eq!(
            HealthCheck::readiness_check(&service).await,
            HealthStatus::Healthy
        );
    }
}
