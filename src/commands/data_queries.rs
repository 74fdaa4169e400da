use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::CommandError;
use crate::application::AppState;
use crate::domain::{PokemonDetails, TableCounts};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonNamesResponse {
    pub pokemon_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStatus {
    pub database_url: String,
    pub counts: TableCounts,
}

/// All stored names, sorted case-insensitively
pub async fn list_pokemon_names(state: &AppState) -> Result<PokemonNamesResponse, CommandError> {
    match state.queries.sorted_names().await {
        Ok(pokemon_names) => {
            info!("✅ Retrieved {} pokemon names", pokemon_names.len());
            Ok(PokemonNamesResponse { pokemon_names })
        }
        Err(e) => {
            error!("Failed to list pokemon names: {}", e);
            Err(CommandError::Storage)
        }
    }
}

/// Parent record with abilities, types and stats for an exact name
pub async fn get_pokemon_details(
    state: &AppState,
    name: &str,
) -> Result<PokemonDetails, CommandError> {
    match state.queries.details(name).await {
        Ok(Some(details)) => Ok(details),
        Ok(None) => Err(CommandError::NotFound(name.to_string())),
        Err(e) => {
            error!("Failed to load pokemon '{}': {}", name, e);
            Err(CommandError::Storage)
        }
    }
}

pub async fn get_database_status(state: &AppState) -> Result<DatabaseStatus, CommandError> {
    let counts = state.queries.table_counts().await.map_err(|e| {
        error!("Failed to count rows: {}", e);
        CommandError::Storage
    })?;

    Ok(DatabaseStatus {
        database_url: state.config.database.url.clone(),
        counts,
    })
}
