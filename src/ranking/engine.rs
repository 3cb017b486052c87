//! Ranking engine: pure operations over a game collection
//!
//! Every mutation takes the current collection by value, applies one intent,
//! recomputes all ranks and hands back the new collection for persistence
//! together with the affected record. Nothing here touches storage.

use crate::error::{RankingError, Result};
use crate::ranking::recompute::{recalculate, recompute_with_overrides};
use crate::types::{
    GameCollection, GameRecord, Mutation, PlayOutcome, RankedListOptions, SortBy, SortOrder,
    StatisticsSummary, StatusOutcome,
};
use crate::utils::{current_timestamp, rounded_average};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Highest accepted manual rank; one value stays free for the overflow rank
pub const MAX_MANUAL_RANK: u32 = u32::MAX - 1;

/// Source of "now" for timestamps stamped by mutations
pub type Clock = fn() -> DateTime<Utc>;

/// Stateless ranking engine
#[derive(Debug, Clone, Copy)]
pub struct RankingEngine {
    clock: Clock,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingEngine {
    /// Create an engine stamping wall-clock UTC time
    pub fn new() -> Self {
        Self {
            clock: current_timestamp,
        }
    }

    /// Create an engine with a fixed time source
    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Count one play of `game_id` and re-rank the collection
    pub fn record_play(
        &self,
        mut collection: GameCollection,
        game_id: &str,
    ) -> Result<Mutation<PlayOutcome>> {
        let index = find_game(&collection, game_id)?;
        let game = &mut collection[index];
        game.play_count += 1;
        game.last_played = Some(self.now());

        let collection = recalculate(collection);
        let record = take_record(&collection, game_id)?;
        debug!(
            "Recorded play for '{}' - plays: {}, rank: {:?}",
            game_id, record.play_count, record.rank
        );

        Ok(Mutation {
            outcome: PlayOutcome {
                total_plays: record.play_count,
                rank: record.rank,
                record,
            },
            collection,
        })
    }

    /// Activate or deactivate `game_id` and re-rank the collection.
    ///
    /// A deactivated record gives up its automatic rank and lands in the
    /// overflow bucket after the active records.
    pub fn set_active_status(
        &self,
        mut collection: GameCollection,
        game_id: &str,
        is_active: bool,
    ) -> Result<Mutation<StatusOutcome>> {
        let index = find_game(&collection, game_id)?;
        let game = &mut collection[index];
        game.is_active = is_active;
        game.status_updated_at = Some(self.now());
        if !is_active && !game.is_pinned() {
            game.rank = None;
        }

        let collection = recalculate(collection);
        let record = take_record(&collection, game_id)?;
        let message = if is_active {
            format!("Game '{}' activated", record.name)
        } else {
            format!("Game '{}' deactivated", record.name)
        };

        Ok(Mutation {
            outcome: StatusOutcome { record, message },
            collection,
        })
    }

    /// Pin `game_id` to `rank`; automatic ranks move around the pin
    pub fn set_manual_rank(
        &self,
        mut collection: GameCollection,
        game_id: &str,
        rank: i64,
    ) -> Result<Mutation<StatusOutcome>> {
        let rank = validate_rank(rank)?;
        let index = find_game(&collection, game_id)?;
        let game = &mut collection[index];
        game.manual_rank = Some(rank);
        game.rank = Some(rank);
        game.rank_updated_at = Some(self.now());

        let collection = recompute_with_overrides(collection);
        let record = take_record(&collection, game_id)?;

        Ok(Mutation {
            outcome: StatusOutcome {
                message: format!("Manual rank for '{}' set to {}", record.name, rank),
                record,
            },
            collection,
        })
    }

    /// Drop the manual pin on `game_id` and return it to automatic ranking
    pub fn clear_manual_rank(
        &self,
        mut collection: GameCollection,
        game_id: &str,
    ) -> Result<Mutation<StatusOutcome>> {
        let index = find_game(&collection, game_id)?;
        let game = &mut collection[index];
        game.manual_rank = None;
        game.rank = None;
        game.rank_updated_at = Some(self.now());

        let collection = recalculate(collection);
        let record = take_record(&collection, game_id)?;

        Ok(Mutation {
            outcome: StatusOutcome {
                message: format!("Manual rank for '{}' cleared", record.name),
                record,
            },
            collection,
        })
    }

    /// Give a freshly created record its initial ranking state
    pub fn initialize_ranking(&self, record: GameRecord) -> GameRecord {
        GameRecord {
            play_count: 0,
            rank: Some(1),
            is_active: true,
            last_played: None,
            created_at: Some(self.now()),
            manual_rank: None,
            ..record
        }
    }

    /// Insert a new record into the collection and re-rank it
    pub fn register_game(
        &self,
        mut collection: GameCollection,
        record: GameRecord,
    ) -> Result<Mutation<GameRecord>> {
        require_id(&record.id)?;
        if collection.iter().any(|g| g.id == record.id) {
            warn!("Rejected duplicate game id '{}'", record.id);
            return Err(RankingError::invalid(format!(
                "game '{}' already exists",
                record.id
            )));
        }

        let game_id = record.id.clone();
        let mut record = self.initialize_ranking(record);
        // The initial rank is a placeholder until the recompute below
        record.rank = None;
        collection.push(record);

        let collection = recalculate(collection);
        let record = take_record(&collection, &game_id)?;
        Ok(Mutation {
            outcome: record,
            collection,
        })
    }

    /// Remove a record from the collection and re-rank what remains
    pub fn remove_game(
        &self,
        mut collection: GameCollection,
        game_id: &str,
    ) -> Result<Mutation<GameRecord>> {
        let index = find_game(&collection, game_id)?;
        let removed = collection.remove(index);
        let collection = recalculate(collection);

        Ok(Mutation {
            outcome: removed,
            collection,
        })
    }

    /// The best ranked `limit` records, optionally active ones only
    pub fn top_games(
        &self,
        collection: &[GameRecord],
        limit: usize,
        active_only: bool,
    ) -> Vec<GameRecord> {
        if limit == 0 {
            return Vec::new();
        }

        let mut games: Vec<GameRecord> = collection
            .iter()
            .filter(|g| !active_only || g.is_active)
            .cloned()
            .collect();
        games.sort_by_key(rank_key);
        games.truncate(limit);
        games
    }

    /// The whole collection, filtered and ordered per `options`
    pub fn all_ranked(
        &self,
        collection: &[GameRecord],
        options: RankedListOptions,
    ) -> Vec<GameRecord> {
        let mut games: Vec<GameRecord> = collection
            .iter()
            .filter(|g| !options.active_only || g.is_active)
            .cloned()
            .collect();

        games.sort_by(|a, b| {
            let ordering = compare_by(options.sort_by, a, b);
            match options.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        games
    }

    /// Aggregate play numbers over the collection
    pub fn statistics(&self, collection: &[GameRecord]) -> StatisticsSummary {
        let total_games = collection.len();
        let active_games = collection.iter().filter(|g| g.is_active).count();
        let total_plays: u64 = collection.iter().map(|g| g.play_count).sum();

        let most_played = collection
            .iter()
            .filter(|g| g.is_active && g.play_count > 0)
            .fold(None::<&GameRecord>, |best, g| match best {
                Some(current) if current.play_count >= g.play_count => Some(current),
                _ => Some(g),
            })
            .cloned();

        StatisticsSummary {
            total_games,
            active_games,
            inactive_games: total_games - active_games,
            total_plays,
            most_played,
            average_plays: rounded_average(total_plays, total_games),
        }
    }
}

fn require_id(game_id: &str) -> Result<()> {
    if game_id.trim().is_empty() {
        return Err(RankingError::invalid("game id is required"));
    }
    Ok(())
}

fn validate_rank(rank: i64) -> Result<u32> {
    if rank < 1 {
        return Err(RankingError::invalid(format!(
            "rank must be a positive integer, got {}",
            rank
        )));
    }
    match u32::try_from(rank) {
        Ok(rank) if rank <= MAX_MANUAL_RANK => Ok(rank),
        _ => Err(RankingError::invalid(format!(
            "rank {} is out of range, the maximum is {}",
            rank, MAX_MANUAL_RANK
        ))),
    }
}

fn find_game(collection: &[GameRecord], game_id: &str) -> Result<usize> {
    require_id(game_id)?;
    collection
        .iter()
        .position(|g| g.id == game_id)
        .ok_or_else(|| RankingError::not_found(game_id))
}

fn take_record(collection: &[GameRecord], game_id: &str) -> Result<GameRecord> {
    collection
        .iter()
        .find(|g| g.id == game_id)
        .cloned()
        .ok_or_else(|| RankingError::not_found(game_id))
}

fn rank_key(game: &GameRecord) -> u32 {
    game.rank.unwrap_or(u32::MAX)
}

/// Ascending comparison where a missing value sorts last
fn compare_by(sort_by: SortBy, a: &GameRecord, b: &GameRecord) -> Ordering {
    match sort_by {
        SortBy::Rank => rank_key(a).cmp(&rank_key(b)),
        SortBy::PlayCount => a.play_count.cmp(&b.play_count),
        SortBy::Name => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
        SortBy::LastPlayed => {
            let key = |g: &GameRecord| g.last_played.unwrap_or(DateTime::<Utc>::MAX_UTC);
            key(a).cmp(&key(b))
        }
    }
}
