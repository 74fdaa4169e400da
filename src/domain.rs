//! Domain module - Core types of the catalog mirror
//!
//! Identifiers, upstream payloads, stored records, sync outcomes and the
//! error taxonomy, plus the traits the engine talks to storage and the
//! upstream catalog through.

pub mod catalog_id;
pub mod errors;
pub mod events;
pub mod outcomes;
pub mod pokemon;
pub mod repositories;

// Re-export commonly used items for convenience
pub use catalog_id::{EntityId, IdLookup, extract_entity_id};
pub use errors::{RepositoryError, SourceError, SyncError};
pub use events::SyncProgress;
pub use outcomes::{FetchOutcome, SkipReason, SkippedEntity, SyncReport};
pub use pokemon::{
    CatalogPage, NamedResource, Pokemon, PokemonAbility, PokemonDetails, PokemonPayload,
    PokemonStat, PokemonType,
};
pub use repositories::{CatalogSource, PokemonRepository, TableCounts, UpsertKind};
