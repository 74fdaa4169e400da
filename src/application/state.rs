//! Application state
//!
//! Wires configuration, storage and the upstream client into the services the
//! command layer drives. One `AppState` lives for the whole process.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::application::progress::{ProgressObserver, TracingProgressObserver};
use crate::application::queries::PokemonQueryService;
use crate::application::sync_orchestrator::SyncOrchestrator;
use crate::domain::{CatalogSource, PokemonRepository};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::{
    DatabaseConnection, HttpClient, HttpClientConfig, PokeApiClient, SqlitePokemonRepository,
};

pub struct AppState {
    pub config: AppConfig,
    pub orchestrator: Arc<SyncOrchestrator>,
    pub queries: PokemonQueryService,
}

impl AppState {
    /// Assemble state from already-built collaborators
    pub fn new(
        config: AppConfig,
        source: Arc<dyn CatalogSource>,
        repository: Arc<dyn PokemonRepository>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Self {
        let orchestrator =
            SyncOrchestrator::new(source, repository.clone(), observer, config.sync.clone());
        Self {
            config,
            orchestrator: Arc::new(orchestrator),
            queries: PokemonQueryService::new(repository),
        }
    }

    /// Open the database, bootstrap the schema and build the PokeAPI client
    pub async fn initialize(config: AppConfig) -> Result<Self> {
        let db = DatabaseConnection::from_config(&config.database).await?;
        db.migrate().await?;
        info!("Database ready at {}", config.database.url);

        let http = HttpClient::new(HttpClientConfig::from(&config.upstream))
            .context("Failed to build upstream HTTP client")?;
        let source = PokeApiClient::new(Arc::new(http), config.upstream.base_url.clone());
        let repository = SqlitePokemonRepository::new(db.pool().clone());

        Ok(Self::new(
            config,
            Arc::new(source),
            Arc::new(repository),
            Arc::new(TracingProgressObserver),
        ))
    }

    /// Token that cancels the in-flight sync and any running schedule
    pub fn cancellation_token(&self) -> CancellationToken {
        self.orchestrator.cancellation_token()
    }
}
