//! Operations exposed to the outside world
//!
//! Each command takes the shared `AppState`, calls into the application layer
//! and returns a serializable response or a `CommandError` whose message is
//! safe to show to a user. Fine-grained causes are logged, not returned.

use serde::Serialize;
use thiserror::Error;

pub mod data_queries;
pub mod sync_commands;

pub use data_queries::{
    DatabaseStatus, PokemonNamesResponse, get_database_status, get_pokemon_details,
    list_pokemon_names,
};
pub use sync_commands::{SyncResponse, run_scheduled_sync, trigger_sync};

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "error", content = "detail", rename_all = "snake_case")]
pub enum CommandError {
    /// Any failure of a sync run
    #[error("Pokemon not found or API unavailable.")]
    SourceUnavailable,

    #[error("No pokemon named '{0}'.")]
    NotFound(String),

    /// Reading the local store failed
    #[error("An error occurred while fetching Pokemon data.")]
    Storage,
}
