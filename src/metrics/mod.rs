//! Metrics for the game ranking service
//!
//! Prometheus counters and histograms for ranking operations; the
//! `/metrics` endpoint in the API layer renders the registry.

pub mod collector;

pub use collector::{MetricsCollector, RankingMetrics};
