//! Progress observations emitted while a sync run is in flight

use serde::{Deserialize, Serialize};

/// Snapshot of how far a sync run has progressed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncProgress {
    /// Identifiers processed so far (reconciled or skipped)
    pub processed: usize,
    /// Identifiers discovered for this run
    pub total: usize,
    /// `processed / total * 100`, rounded to one decimal place
    pub percentage: f64,
}

impl SyncProgress {
    pub fn new(processed: usize, total: usize) -> Self {
        Self {
            processed,
            total,
            percentage: percentage_of(processed, total),
        }
    }
}

/// Percentage rounded to one decimal place; an empty total counts as complete
#[allow(clippy::cast_precision_loss)]
pub fn percentage_of(processed: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let raw = processed as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}
