//! Application layer
//!
//! The sync engine (discovery, fetch, reconcile, orchestration) and the read
//! side over the mirrored data. The engine talks to the outside world only
//! through the `CatalogSource` and `PokemonRepository` traits; `AppState`
//! picks the concrete implementations.

pub mod catalog_discovery;
pub mod entity_fetcher;
pub mod progress;
pub mod queries;
pub mod state;
pub mod sync_orchestrator;
pub mod upsert_reconciler;

#[cfg(test)]
pub(crate) mod fakes;

pub use catalog_discovery::CatalogDiscoveryService;
pub use entity_fetcher::EntityFetcher;
pub use progress::{NoopProgressObserver, ProgressObserver, TracingProgressObserver};
pub use queries::PokemonQueryService;
pub use state::AppState;
pub use sync_orchestrator::SyncOrchestrator;
pub use upsert_reconciler::UpsertReconciler;
