//! HTTP tests for the ranking API
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`,
//! so routing, extraction and error rendering are all exercised.

mod fixtures;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use fixtures::{game, inactive_game, ranked_collection};
use game_ranking::api::{create_router, ApiState};
use game_ranking::config::RankingSettings;
use game_ranking::metrics::MetricsCollector;
use game_ranking::storage::{GameStore, InMemoryGameStore, RecordingGameStore};
use game_ranking::types::GameRecord;
use game_ranking::RankingService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router_over(store: Arc<dyn GameStore>) -> Router {
    let metrics_collector = Arc::new(MetricsCollector::new().unwrap());
    let ranking_service = RankingService::new(store).with_metrics(metrics_collector.clone());
    create_router(ApiState {
        service_name: "game-ranking-test".to_string(),
        ranking_service,
        metrics_collector,
        settings: RankingSettings {
            default_top_limit: 2,
            max_top_limit: 3,
        },
    })
}

fn seeded_router(games: Vec<GameRecord>) -> Router {
    router_over(Arc::new(InMemoryGameStore::with_games(ranked_collection(
        games,
    ))))
}

fn sample_games() -> Vec<GameRecord> {
    vec![
        game("A", 40),
        game("B", 30),
        game("C", 20),
        game("D", 10),
        inactive_game("E", 50),
    ]
}

async fn send(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn ids(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_top_games_uses_default_and_max_limits() {
    let router = seeded_router(sample_games());

    let (status, body) = send(router.clone(), Method::GET, "/games/top", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["A", "B"]);

    let (_, body) = send(router.clone(), Method::GET, "/games/top?limit=50", None).await;
    assert_eq!(ids(&body), vec!["A", "B", "C"]);

    let (_, body) = send(router, Method::GET, "/games/top?limit=0", None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_top_games_rejects_negative_limit() {
    let router = seeded_router(sample_games());

    let (status, body) = send(router, Method::GET, "/games/top?limit=-1", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_argument");
}

#[tokio::test]
async fn test_ranked_listing_includes_inactive_by_default() {
    let router = seeded_router(sample_games());

    let (_, body) = send(router.clone(), Method::GET, "/games/ranked", None).await;
    assert_eq!(ids(&body), vec!["A", "B", "C", "D", "E"]);

    let (_, body) = send(
        router,
        Method::GET,
        "/games/ranked?activeOnly=true&sortBy=playCount&sortOrder=asc",
        None,
    )
    .await;
    assert_eq!(ids(&body), vec!["D", "C", "B", "A"]);
}

#[tokio::test]
async fn test_record_play_returns_new_rank() {
    let router = seeded_router(sample_games());

    let (status, body) = send(router, Method::POST, "/games/D/play", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalPlays"], 11);
    assert_eq!(body["rank"], 4);
    assert_eq!(body["record"]["playCount"], 11);
}

#[tokio::test]
async fn test_unknown_game_is_not_found() {
    let router = seeded_router(sample_games());

    let (status, body) = send(router.clone(), Method::POST, "/games/nope/play", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    let (status, _) = send(router, Method::DELETE, "/games/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_and_rank_endpoints() {
    let router = seeded_router(sample_games());

    let (status, body) = send(
        router.clone(),
        Method::PUT,
        "/games/A/status",
        Some(json!({ "isActive": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record"]["isActive"], false);

    let (status, body) = send(
        router.clone(),
        Method::PUT,
        "/games/D/rank",
        Some(json!({ "rank": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record"]["rank"], 1);
    assert_eq!(body["record"]["manualRank"], 1);

    let (_, body) = send(router.clone(), Method::GET, "/games/top?limit=3", None).await;
    assert_eq!(ids(&body), vec!["D", "B", "C"]);

    let (status, body) = send(router.clone(), Method::DELETE, "/games/D/rank", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["record"].get("manualRank").is_none());
    assert_eq!(body["record"]["rank"], 3);
}

#[tokio::test]
async fn test_invalid_manual_rank_is_bad_request() {
    let router = seeded_router(sample_games());

    for rank in [0i64, u32::MAX as i64] {
        let (status, body) = send(
            router.clone(),
            Method::PUT,
            "/games/A/rank",
            Some(json!({ "rank": rank })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_argument");
    }
}

#[tokio::test]
async fn test_register_and_delete_game() {
    let router = seeded_router(Vec::new());

    let (status, body) = send(
        router.clone(),
        Method::POST,
        "/games",
        Some(json!({ "id": "snake", "name": "Snake", "category": "arcade" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rank"], 1);
    assert_eq!(body["playCount"], 0);

    let (status, _) = send(
        router.clone(),
        Method::POST,
        "/games",
        Some(json!({ "id": "snake", "name": "Snake II" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(router.clone(), Method::DELETE, "/games/snake", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "snake");

    let (_, body) = send(router, Method::GET, "/games/stats", None).await;
    assert_eq!(body["totalGames"], 0);
}

#[tokio::test]
async fn test_statistics_endpoint() {
    let router = seeded_router(sample_games());

    let (status, body) = send(router, Method::GET, "/games/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalGames"], 5);
    assert_eq!(body["activeGames"], 4);
    assert_eq!(body["inactiveGames"], 1);
    assert_eq!(body["totalPlays"], 150);
    assert_eq!(body["averagePlays"], 30);
    assert_eq!(body["mostPlayed"]["id"], "A");
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let store = Arc::new(RecordingGameStore::with_games(ranked_collection(
        sample_games(),
    )));
    store.fail_next_load();
    let router = router_over(store.clone());

    let (status, body) = send(router, Method::POST, "/games/A/play", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "storage_failure");
    assert_eq!(body["error"], "Internal storage error");
    assert_eq!(store.save_count().await, 0);
}

#[tokio::test]
async fn test_health_and_liveness() {
    let router = seeded_router(sample_games());

    let (status, body) = send(router.clone(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["stats"]["total_games"], 5);

    let response = router
        .oneshot(Request::builder().uri("/alive").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_fails_when_store_unreachable() {
    let store = Arc::new(RecordingGameStore::new());
    store.fail_next_load();
    let router = router_over(store);

    let response = router
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_metrics_count_recorded_plays() {
    let router = seeded_router(sample_games());

    send(router.clone(), Method::POST, "/games/A/play", None).await;
    send(router.clone(), Method::POST, "/games/B/play", None).await;

    let response = router
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains("game_ranking_plays_recorded_total 2"));
    assert!(text.contains("game_ranking_mutations_total"));
}
