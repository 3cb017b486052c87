//! Common types used throughout the ranking service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for games
pub type GameId = String;

fn default_active() -> bool {
    true
}

/// One playable title and its ranking state
///
/// Stored as part of a single JSON document, so field names follow the
/// camelCase layout of that document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: GameId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_url: Option<String>,

    #[serde(default)]
    pub play_count: u64,
    #[serde(default)]
    pub last_played: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_rank: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl GameRecord {
    /// Create a bare record with no ranking state yet
    pub fn new(id: impl Into<GameId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            slug: String::new(),
            thumbnail_url: None,
            logo_url: None,
            preview_url: None,
            play_url: None,
            play_count: 0,
            last_played: None,
            is_active: true,
            rank: None,
            manual_rank: None,
            status_updated_at: None,
            rank_updated_at: None,
            created_at: None,
        }
    }

    /// Whether the rank of this record is fixed by an admin override
    pub fn is_pinned(&self) -> bool {
        self.manual_rank.is_some()
    }
}

/// The whole persisted collection, in insertion order
pub type GameCollection = Vec<GameRecord>;

/// Field used to order a ranked listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Rank,
    PlayCount,
    Name,
    LastPlayed,
}

impl SortBy {
    /// Parse a sort field, falling back to `Rank` for anything unknown
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "rank" => SortBy::Rank,
            "playCount" | "play_count" => SortBy::PlayCount,
            "name" => SortBy::Name,
            "lastPlayed" | "last_played" => SortBy::LastPlayed,
            _ => SortBy::Rank,
        }
    }
}

/// Direction of a ranked listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse_or_default(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortBy::Rank => write!(f, "rank"),
            SortBy::PlayCount => write!(f, "playCount"),
            SortBy::Name => write!(f, "name"),
            SortBy::LastPlayed => write!(f, "lastPlayed"),
        }
    }
}

/// Options for listing the whole ranked collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RankedListOptions {
    pub active_only: bool,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

/// Result of recording a play
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayOutcome {
    pub record: GameRecord,
    pub total_plays: u64,
    pub rank: Option<u32>,
}

/// Result of a status or rank change
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOutcome {
    pub record: GameRecord,
    pub message: String,
}

/// A mutation applied by the engine, paired with the collection to persist
#[derive(Debug, Clone)]
pub struct Mutation<T> {
    pub outcome: T,
    pub collection: GameCollection,
}

/// Aggregate numbers over the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    pub total_games: usize,
    pub active_games: usize,
    pub inactive_games: usize,
    pub total_plays: u64,
    pub most_played: Option<GameRecord>,
    pub average_plays: u64,
}
