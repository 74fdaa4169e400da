//! Read side over the mirrored data

use std::sync::Arc;

use crate::domain::{PokemonDetails, PokemonRepository, RepositoryError, TableCounts};

pub struct PokemonQueryService {
    repository: Arc<dyn PokemonRepository>,
}

impl PokemonQueryService {
    pub fn new(repository: Arc<dyn PokemonRepository>) -> Self {
        Self { repository }
    }

    /// Every stored name, sorted case-insensitively; ties keep storage order
    pub async fn sorted_names(&self) -> Result<Vec<String>, RepositoryError> {
        let mut names = self.repository.list_names().await?;
        names.sort_by_cached_key(|name| name.to_lowercase());
        Ok(names)
    }

    /// Exact, case-sensitive name lookup
    pub async fn details(&self, name: &str) -> Result<Option<PokemonDetails>, RepositoryError> {
        self.repository.find_by_name(name).await
    }

    pub async fn table_counts(&self) -> Result<TableCounts, RepositoryError> {
        self.repository.table_counts().await
    }
}
