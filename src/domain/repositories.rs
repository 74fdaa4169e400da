//! Seams between the sync engine and the outside world
//!
//! `CatalogSource` is the read-only upstream catalog, `PokemonRepository` is
//! the local relational store. Both are object-safe so the engine can hold
//! them as `Arc<dyn _>` and tests can substitute in-memory implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::catalog_id::EntityId;
use super::errors::{RepositoryError, SourceError};
use super::pokemon::{CatalogPage, PokemonDetails, PokemonPayload};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Collection root; only `count` is meaningful
    async fn fetch_catalog_root(&self) -> Result<CatalogPage, SourceError>;

    /// Listing page of up to `limit` item references, in upstream order
    async fn fetch_listing(&self, limit: u64) -> Result<CatalogPage, SourceError>;

    /// Detail document for one identifier
    async fn fetch_detail(&self, id: &EntityId) -> Result<PokemonPayload, SourceError>;
}

/// Whether reconciliation inserted a new parent row or refreshed an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertKind {
    Created,
    Updated,
}

/// Row counts per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub pokemon: i64,
    pub abilities: i64,
    pub types: i64,
    pub stats: i64,
}

#[async_trait]
pub trait PokemonRepository: Send + Sync {
    /// Write the parent row and upsert all three child collections atomically
    async fn reconcile(&self, payload: &PokemonPayload) -> Result<UpsertKind, RepositoryError>;

    /// All stored names, in storage order
    async fn list_names(&self) -> Result<Vec<String>, RepositoryError>;

    /// Parent plus children for an exact name match
    async fn find_by_name(&self, name: &str) -> Result<Option<PokemonDetails>, RepositoryError>;

    async fn table_counts(&self) -> Result<TableCounts, RepositoryError>;
}
