//! Game ranking: recompute algorithm, pure engine and storage-backed service
//!
//! Ranks are derived from play counts (more recent play wins ties) and can be
//! pinned by manual overrides that automatic ranks route around.

pub mod engine;
pub mod recompute;
pub mod service;

// Re-export commonly used types
pub use engine::{Clock, RankingEngine, MAX_MANUAL_RANK};
pub use recompute::{popularity_order, recalculate, recompute, recompute_with_overrides};
pub use service::RankingService;
