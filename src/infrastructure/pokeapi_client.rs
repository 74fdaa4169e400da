//! `CatalogSource` backed by the PokeAPI REST endpoints

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::domain::{CatalogPage, CatalogSource, EntityId, PokemonPayload, SourceError};
use crate::infrastructure::http_client::HttpClient;

/// Talks to `{base}`, `{base}?limit=N` and `{base}/{id}`
pub struct PokeApiClient {
    http: Arc<HttpClient>,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(http: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn listing_url(&self, limit: u64) -> String {
        format!("{}?limit={limit}", self.base_url)
    }

    fn detail_url(&self, id: &EntityId) -> String {
        format!("{}/{id}", self.base_url)
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn fetch_catalog_root(&self) -> Result<CatalogPage, SourceError> {
        self.http.get_json(&self.base_url).await
    }

    async fn fetch_listing(&self, limit: u64) -> Result<CatalogPage, SourceError> {
        let url = self.listing_url(limit);
        debug!("Fetching catalog listing: {}", url);
        self.http.get_json(&url).await
    }

    async fn fetch_detail(&self, id: &EntityId) -> Result<PokemonPayload, SourceError> {
        self.http.get_json(&self.detail_url(id)).await
    }
}
