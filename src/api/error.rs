//! HTTP rendering of ranking errors

use crate::error::RankingError;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl IntoResponse for RankingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Storage causes stay in the logs
            RankingError::StorageFailure { .. } => "Internal storage error".to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message, "kind": self.kind() }))).into_response()
    }
}
