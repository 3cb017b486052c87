//! Main application state and service coordination
//!
//! This module wires the configured game store, the ranking service and the
//! metrics collector together and runs the HTTP server.

use crate::api::{create_router, ApiState};
use crate::config::{AppConfig, StorageBackend};
use crate::metrics::MetricsCollector;
use crate::ranking::RankingService;
use crate::storage::{GameStore, InMemoryGameStore, JsonFileGameStore};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::info;

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("HTTP server error: {message}")]
    Server { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Ranking operations over the configured store
    ranking_service: RankingService,

    /// Metrics collector for the /metrics endpoint
    metrics_collector: Arc<MetricsCollector>,

    /// Service status
    is_running: Arc<RwLock<bool>>,
}

impl AppState {
    /// Initialize the application with all dependencies
    pub async fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing game ranking service");
        info!(
            "Configuration: service={}, storage={}",
            config.service.name, config.storage.backend
        );

        let metrics_collector =
            Arc::new(
                MetricsCollector::new().map_err(|e| ServiceError::Initialization {
                    message: format!("Failed to create metrics collector: {}", e),
                })?,
            );

        let store = Self::initialize_store(&config);
        let ranking_service = RankingService::new(store).with_metrics(metrics_collector.clone());

        Ok(Self {
            config,
            ranking_service,
            metrics_collector,
            is_running: Arc::new(RwLock::new(false)),
        })
    }

    fn initialize_store(config: &AppConfig) -> Arc<dyn GameStore> {
        match config.storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory game store");
                Arc::new(InMemoryGameStore::new())
            }
            StorageBackend::File => {
                info!(
                    "Using JSON file game store at {}",
                    config.storage.data_path.display()
                );
                Arc::new(JsonFileGameStore::new(config.storage.data_path.clone()))
            }
        }
    }

    /// Router serving the API, health and metrics endpoints
    pub fn router(&self) -> Router {
        create_router(ApiState {
            service_name: self.config.service.name.clone(),
            ranking_service: self.ranking_service.clone(),
            metrics_collector: self.metrics_collector.clone(),
            settings: self.config.ranking.clone(),
        })
    }

    /// Serve HTTP until `shutdown` resolves
    pub async fn serve<F>(&self, shutdown: F) -> Result<(), ServiceError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServiceError::Server {
                message: format!("Failed to bind {}: {}", addr, e),
            })?;

        info!("HTTP server listening on http://{}", addr);
        *self.is_running.write().await = true;

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServiceError::Server {
                message: e.to_string(),
            });

        *self.is_running.write().await = false;
        info!("HTTP server stopped");
        result
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the ranking service
    pub fn ranking_service(&self) -> &RankingService {
        &self.ranking_service
    }

    /// Get the metrics collector
    pub fn metrics_collector(&self) -> Arc<MetricsCollector> {
        self.metrics_collector.clone()
    }

    /// Check if the HTTP server is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config
    }

    #[tokio::test]
    async fn test_app_state_initialization() {
        let app_state = AppState::new(memory_config()).await.unwrap();

        assert!(!app_state.is_running().await);
        assert_eq!(app_state.config().service.name, "game-ranking");
        let games = app_state.ranking_service().load().await.unwrap();
        assert!(games.is_empty());
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let mut config = memory_config();
        config.service.host = "127.0.0.1".to_string();
        config.service.http_port = 0;
        let app_state = AppState::new(config).await.unwrap();

        app_state.serve(async {}).await.unwrap();
        assert!(!app_state.is_running().await);
    }
}
