//! Per-identifier fetch outcomes and the report of a completed sync run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog_id::IdLookup;
use super::pokemon::PokemonPayload;

/// Why an identifier was passed over without reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The detail endpoint answered with a non-success status
    UpstreamStatus { status: u16 },
    /// The listing entry carried no extractable identifier
    UnresolvableId,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpstreamStatus { status } => write!(f, "upstream returned HTTP {status}"),
            Self::UnresolvableId => f.write_str("listing entry has no identifier"),
        }
    }
}

/// Non-fatal result of fetching one identifier
///
/// Hard failures are reported through `Err(SyncError)` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched(Box<PokemonPayload>),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntity {
    pub id: IdLookup,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Summary of a sync run that processed every discovered identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub total: usize,
    /// Entities written, new or refreshed
    pub reconciled: usize,
    /// Subset of `reconciled` that did not exist locally before this run
    pub created: usize,
    pub skipped: Vec<SkippedEntity>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
