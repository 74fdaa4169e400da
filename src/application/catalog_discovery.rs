//! Catalog discovery
//!
//! Two requests: the collection root for the declared `count`, then one
//! listing page with `limit=count`. Every listed item yields one slot in the
//! result, in listing order, even when its URL carries no identifier.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{CatalogSource, IdLookup, SyncError, extract_entity_id};

pub struct CatalogDiscoveryService {
    source: Arc<dyn CatalogSource>,
}

impl CatalogDiscoveryService {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }

    /// Discover every upstream identifier in listing order
    ///
    /// Fails as a whole with `DiscoveryFailed` if either request fails; a
    /// partial listing is never returned.
    pub async fn discover_all_ids(&self) -> Result<Vec<IdLookup>, SyncError> {
        info!("🔍 Discovering catalog identifiers");

        let root = self
            .source
            .fetch_catalog_root()
            .await
            .map_err(|source| SyncError::DiscoveryFailed { source })?;
        let declared = root.count;

        let listing = self
            .source
            .fetch_listing(declared)
            .await
            .map_err(|source| SyncError::DiscoveryFailed { source })?;

        if listing.results.len() as u64 != declared {
            warn!(
                "Listing returned {} items but the catalog declared {}",
                listing.results.len(),
                declared
            );
        }

        let ids: Vec<IdLookup> = listing
            .results
            .iter()
            .map(|item| {
                let lookup = item.url.as_deref().map_or(IdLookup::NotFound, extract_entity_id);
                if !lookup.is_found() {
                    warn!("No identifier in listing entry '{}'", item.name);
                }
                lookup
            })
            .collect();

        info!("Discovered {} catalog identifiers", ids.len());
        Ok(ids)
    }
}
