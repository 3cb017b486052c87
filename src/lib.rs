//! Game Ranking - play-count rankings for a catalogue of games
//!
//! This crate keeps a dense ranking over a collection of game records,
//! supports manual rank overrides, and persists the whole re-ranked
//! collection through a pluggable game store after every mutation.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod ranking;
pub mod service;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RankingError, Result};
pub use types::*;

// Re-export key components
pub use ranking::{RankingEngine, RankingService};
pub use storage::{GameStore, InMemoryGameStore, JsonFileGameStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
