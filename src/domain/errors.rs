//! Error taxonomy for the synchronization engine
//!
//! `SyncError` is what a sync run fails with. `SourceError` and
//! `RepositoryError` are the lower-level causes reported by the upstream
//! source and the storage layer; they are wrapped, never flattened, so the
//! originating identifier and kind stay visible in logs.

use thiserror::Error;

use super::catalog_id::EntityId;

/// Failure talking to the upstream catalog
#[derive(Error, Debug)]
pub enum SourceError {
    /// The resource could not be reached at all (DNS, connect, timeout, reset)
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The resource answered with a non-success status
    #[error("HTTP error {status} for {url}")]
    Status { url: String, status: u16 },

    /// The body could not be decoded into the expected shape
    #[error("Decode error for {url}: {message}")]
    Decode { url: String, message: String },
}

impl SourceError {
    /// Status code carried by a non-success response, if any
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure inside the storage layer
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

/// Terminating error of a sync run
#[derive(Error, Debug)]
pub enum SyncError {
    /// Total count or listing could not be obtained; nothing was processed
    #[error("Catalog discovery failed: {source}")]
    DiscoveryFailed {
        #[source]
        source: SourceError,
    },

    /// Network-level failure fetching one entity's detail
    #[error("Fetching pokemon {id} failed: {source}")]
    FetchFailed {
        id: EntityId,
        #[source]
        source: SourceError,
    },

    /// Detail payload present but not decodable
    #[error("Malformed payload for pokemon {id}: {source}")]
    MalformedPayload {
        id: EntityId,
        #[source]
        source: SourceError,
    },

    /// Storage failure during one entity's transaction (already rolled back)
    #[error("Reconciling pokemon {id} failed: {source}")]
    ReconcileFailed {
        id: i64,
        #[source]
        source: RepositoryError,
    },

    /// The run was cancelled between identifiers
    #[error("Sync cancelled after {processed} of {total} identifiers")]
    Cancelled { processed: usize, total: usize },
}

impl SyncError {
    /// Short machine-readable kind, used in structured log fields
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DiscoveryFailed { .. } => "discovery_failed",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::MalformedPayload { .. } => "malformed_payload",
            Self::ReconcileFailed { .. } => "reconcile_failed",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}
