//! Rank recomputation over a whole collection
//!
//! Two passes exist: a plain dense ranking when no record is pinned, and an
//! override-aware pass that routes automatic ranks around manual pins.
//! Both take the collection by value and return the re-ranked collection.

use crate::types::{GameCollection, GameRecord};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Popularity order: more plays first, then more recent play first.
/// A record that was never played counts as the oldest possible time.
pub fn popularity_order(a: &GameRecord, b: &GameRecord) -> Ordering {
    b.play_count
        .cmp(&a.play_count)
        .then_with(|| last_played_key(b).cmp(&last_played_key(a)))
}

fn last_played_key(record: &GameRecord) -> DateTime<Utc> {
    record.last_played.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Recompute every rank, choosing the override-aware pass when any record
/// carries a manual rank
pub fn recalculate(collection: GameCollection) -> GameCollection {
    if collection.iter().any(GameRecord::is_pinned) {
        recompute_with_overrides(collection)
    } else {
        recompute(collection)
    }
}

/// Dense ranking of active records by popularity.
///
/// Inactive records share the overflow rank placed right after the active
/// ones. An inactive record keeps an older rank only while that rank still
/// sits behind every active rank.
pub fn recompute(collection: GameCollection) -> GameCollection {
    let (mut active, inactive): (Vec<_>, Vec<_>) =
        collection.into_iter().partition(|g| g.is_active);

    active.sort_by(popularity_order);
    for (index, game) in active.iter_mut().enumerate() {
        game.rank = Some(index as u32 + 1);
    }

    let last_active = active.len() as u32;
    let overflow = last_active.saturating_add(1);
    let mut result = active;
    result.extend(inactive.into_iter().map(|mut game| {
        settle_inactive(&mut game, last_active, overflow);
        game
    }));

    debug!(
        "Recomputed ranks for {} games (overflow rank {})",
        result.len(),
        overflow
    );
    result
}

/// Ranking that honors manual pins.
///
/// Automatic ranks are handed out in popularity order, skipping every value
/// already claimed by a pin. Two pins on the same value both keep it.
pub fn recompute_with_overrides(collection: GameCollection) -> GameCollection {
    let mut pinned = Vec::new();
    let mut auto = Vec::new();
    let mut inactive = Vec::new();
    for game in collection {
        if game.is_pinned() {
            pinned.push(game);
        } else if game.is_active {
            auto.push(game);
        } else {
            inactive.push(game);
        }
    }

    auto.sort_by(popularity_order);

    let mut claimed: HashSet<u32> = pinned.iter().filter_map(|g| g.manual_rank).collect();
    let mut next = 1u32;
    for game in auto.iter_mut() {
        while claimed.contains(&next) {
            next = next.saturating_add(1);
        }
        game.rank = Some(next);
        claimed.insert(next);
        next = next.saturating_add(1);
    }

    for game in pinned.iter_mut() {
        game.rank = game.manual_rank;
    }

    let mut ranked = pinned;
    ranked.extend(auto);
    // Stable: duplicate pins keep their input order
    ranked.sort_by_key(|g| g.rank.unwrap_or(u32::MAX));

    let last_ranked = ranked.iter().filter_map(|g| g.rank).max().unwrap_or(0);
    let overflow = last_ranked.saturating_add(1);
    for game in inactive.iter_mut() {
        settle_inactive(game, last_ranked, overflow);
    }

    debug!(
        "Recomputed ranks for {} games with {} manual pins (overflow rank {})",
        ranked.len() + inactive.len(),
        claimed.len(),
        overflow
    );
    ranked.extend(inactive);
    ranked
}

/// Move an inactive record to `overflow` unless it already ranks behind
/// `last_ranked`
fn settle_inactive(game: &mut GameRecord, last_ranked: u32, overflow: u32) {
    match game.rank {
        Some(rank) if rank > last_ranked => {}
        _ => game.rank = Some(overflow),
    }
}
