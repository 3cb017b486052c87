//! Error types for the ranking service
//!
//! Business-rule violations are typed so the HTTP layer can map them to
//! status codes; storage failures keep their original cause attached.

use axum::http::StatusCode;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RankingError>;

/// Failures surfaced by ranking operations
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("Game not found: {game_id}")]
    NotFound { game_id: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Storage {operation} failed: {source}")]
    StorageFailure {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl RankingError {
    pub fn not_found(game_id: impl Into<String>) -> Self {
        Self::NotFound {
            game_id: game_id.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn storage(operation: &'static str, source: anyhow::Error) -> Self {
        Self::StorageFailure { operation, source }
    }

    /// HTTP status equivalent of this failure
    pub fn status_code(&self) -> StatusCode {
        match self {
            RankingError::NotFound { .. } => StatusCode::NOT_FOUND,
            RankingError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            RankingError::StorageFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            RankingError::NotFound { .. } => "not_found",
            RankingError::InvalidArgument { .. } => "invalid_argument",
            RankingError::StorageFailure { .. } => "storage_failure",
        }
    }
}
