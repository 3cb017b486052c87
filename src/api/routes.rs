//! HTTP endpoints for game rankings, health checks and Prometheus metrics
//!
//! Handlers are thin: they parse the request, call the ranking service and
//! render its result or error.

use crate::config::RankingSettings;
use crate::error::RankingError;
use crate::metrics::MetricsCollector;
use crate::ranking::RankingService;
use crate::service::health::{HealthCheck, HealthStatus};
use crate::types::{
    GameRecord, PlayOutcome, RankedListOptions, SortBy, SortOrder, StatisticsSummary,
    StatusOutcome,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct ApiState {
    pub service_name: String,
    pub ranking_service: RankingService,
    pub metrics_collector: Arc<MetricsCollector>,
    pub settings: RankingSettings,
}

/// Build the router with every endpoint
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/games", post(register_game_handler))
        .route("/games/top", get(top_games_handler))
        .route("/games/ranked", get(all_ranked_handler))
        .route("/games/stats", get(statistics_handler))
        .route("/games/{id}", delete(remove_game_handler))
        .route("/games/{id}/play", post(record_play_handler))
        .route("/games/{id}/status", put(set_status_handler))
        .route(
            "/games/{id}/rank",
            put(set_rank_handler).delete(clear_rank_handler),
        )
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/alive", get(alive_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopGamesQuery {
    limit: Option<i64>,
    active_only: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedQuery {
    active_only: Option<bool>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetStatusRequest {
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct SetRankRequest {
    rank: i64,
}

/// Root endpoint handler - shows service information
async fn root_handler(State(state): State<ApiState>) -> impl IntoResponse {
    Json(json!({
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/games",
            "/games/top",
            "/games/ranked",
            "/games/stats",
            "/health",
            "/ready",
            "/alive",
            "/metrics"
        ]
    }))
}

async fn top_games_handler(
    State(state): State<ApiState>,
    Query(query): Query<TopGamesQuery>,
) -> Result<Json<Vec<GameRecord>>, RankingError> {
    let limit = match query.limit {
        None => state.settings.default_top_limit,
        Some(limit) if limit < 0 => {
            return Err(RankingError::invalid(format!(
                "limit must not be negative, got {}",
                limit
            )))
        }
        Some(limit) => (limit as u64).min(state.settings.max_top_limit as u64) as usize,
    };
    let active_only = query.active_only.unwrap_or(true);

    let games = state.ranking_service.top_games(limit, active_only).await?;
    Ok(Json(games))
}

async fn all_ranked_handler(
    State(state): State<ApiState>,
    Query(query): Query<RankedQuery>,
) -> Result<Json<Vec<GameRecord>>, RankingError> {
    let options = RankedListOptions {
        active_only: query.active_only.unwrap_or(false),
        sort_by: query
            .sort_by
            .as_deref()
            .map(SortBy::parse_or_default)
            .unwrap_or_default(),
        sort_order: query
            .sort_order
            .as_deref()
            .map(SortOrder::parse_or_default)
            .unwrap_or_default(),
    };
    debug!("Ranked listing requested: {:?}", options);

    let games = state.ranking_service.all_ranked(options).await?;
    Ok(Json(games))
}

async fn statistics_handler(
    State(state): State<ApiState>,
) -> Result<Json<StatisticsSummary>, RankingError> {
    Ok(Json(state.ranking_service.statistics().await?))
}

async fn register_game_handler(
    State(state): State<ApiState>,
    Json(record): Json<GameRecord>,
) -> Result<(StatusCode, Json<GameRecord>), RankingError> {
    let record = state.ranking_service.register_game(record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn remove_game_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<GameRecord>, RankingError> {
    Ok(Json(state.ranking_service.remove_game(&id).await?))
}

async fn record_play_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<PlayOutcome>, RankingError> {
    Ok(Json(state.ranking_service.record_play(&id).await?))
}

async fn set_status_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<StatusOutcome>, RankingError> {
    let outcome = state
        .ranking_service
        .set_active_status(&id, request.is_active)
        .await?;
    Ok(Json(outcome))
}

async fn set_rank_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<SetRankRequest>,
) -> Result<Json<StatusOutcome>, RankingError> {
    let outcome = state
        .ranking_service
        .set_manual_rank(&id, request.rank)
        .await?;
    Ok(Json(outcome))
}

async fn clear_rank_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<StatusOutcome>, RankingError> {
    Ok(Json(state.ranking_service.clear_manual_rank(&id).await?))
}

/// Full health report
async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    debug!("Health check requested");

    let health = HealthCheck::check(&state.ranking_service, &state.service_name).await;
    let status = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(health))
}

/// Readiness check endpoint handler
async fn ready_handler(State(state): State<ApiState>) -> impl IntoResponse {
    debug!("Readiness check requested");

    match HealthCheck::readiness_check(&state.ranking_service).await {
        HealthStatus::Healthy => (StatusCode::OK, "Ready"),
        HealthStatus::Unhealthy => (StatusCode::SERVICE_UNAVAILABLE, "Not ready"),
    }
}

/// Liveness check endpoint handler
async fn alive_handler() -> impl IntoResponse {
    (StatusCode::OK, "Alive")
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<ApiState>) -> Response {
    debug!("Metrics endpoint requested");

    let registry = state.metrics_collector.registry();
    let metric_families = registry.gather();
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&metric_families) {
        Ok(metrics_output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            metrics_output,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics".to_string(),
            )
                .into_response()
        }
    }
}
