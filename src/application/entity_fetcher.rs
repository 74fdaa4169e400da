//! Entity fetcher
//!
//! Turns one discovery slot into a `FetchOutcome`. A non-success upstream
//! status is a skip; transport and decode problems end the run.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{CatalogSource, FetchOutcome, IdLookup, SkipReason, SourceError, SyncError};

pub struct EntityFetcher {
    source: Arc<dyn CatalogSource>,
}

impl EntityFetcher {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }

    pub async fn fetch_detail(&self, lookup: &IdLookup) -> Result<FetchOutcome, SyncError> {
        let Some(id) = lookup.as_found() else {
            return Ok(FetchOutcome::Skipped(SkipReason::UnresolvableId));
        };

        match self.source.fetch_detail(id).await {
            Ok(payload) => {
                debug!("Fetched pokemon {} ({})", id, payload.name);
                Ok(FetchOutcome::Fetched(Box::new(payload)))
            }
            Err(SourceError::Status { status, .. }) => {
                warn!("Skipping pokemon {}: upstream returned HTTP {}", id, status);
                Ok(FetchOutcome::Skipped(SkipReason::UpstreamStatus { status }))
            }
            Err(source @ SourceError::Transport { .. }) => Err(SyncError::FetchFailed {
                id: id.clone(),
                source,
            }),
            Err(source @ SourceError::Decode { .. }) => Err(SyncError::MalformedPayload {
                id: id.clone(),
                source,
            }),
        }
    }
}
