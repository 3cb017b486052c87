//! Utility functions for the ranking service

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Generate a unique suffix for scratch files
pub fn generate_scratch_suffix() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Average rounded to the nearest integer, 0 for an empty population
pub fn rounded_average(total: u64, count: usize) -> u64 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as u64
}
