//! In-memory stand-ins for the upstream catalog, the store and progress sinks

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::application::progress::ProgressObserver;
use crate::domain::pokemon::{AbilitySlot, NamedResource, StatSlot, TypeSlot};
use crate::domain::{
    CatalogPage, CatalogSource, EntityId, PokemonDetails, PokemonPayload, PokemonRepository,
    RepositoryError, SourceError, SyncProgress, TableCounts, UpsertKind,
};

pub fn payload(id: i64, name: &str) -> PokemonPayload {
    PokemonPayload {
        id,
        name: name.to_string(),
        height: Some(7),
        weight: Some(69),
        base_experience: Some(64),
        abilities: vec![AbilitySlot {
            ability: NamedResource::named("overgrow"),
            is_hidden: false,
        }],
        types: vec![TypeSlot {
            type_: NamedResource::named("grass"),
        }],
        stats: vec![StatSlot {
            stat: NamedResource::named("hp"),
            effort: 0,
            base_stat: 45,
        }],
    }
}

#[derive(Clone)]
enum Detail {
    Payload(PokemonPayload),
    Status(u16),
    Transport,
    Decode,
}

/// Catalog served from memory; unknown detail ids answer 404
#[derive(Clone, Default)]
pub struct FakeCatalog {
    urls: Vec<String>,
    declared: Option<u64>,
    root_fails: bool,
    listing_fails: bool,
    details: HashMap<String, Detail>,
    listing_limits: Arc<Mutex<Vec<u64>>>,
    detail_requests: Arc<Mutex<Vec<String>>>,
}

impl FakeCatalog {
    pub fn with_urls(urls: &[&str]) -> Self {
        Self {
            urls: urls.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    /// Ids `1..=n`, each with a valid payload named `pokemon-<id>`
    pub fn with_pokemon(n: i64) -> Self {
        let mut catalog = Self::default();
        for id in 1..=n {
            catalog
                .urls
                .push(format!("https://pokeapi.co/api/v2/pokemon/{id}/"));
            catalog
                .details
                .insert(id.to_string(), Detail::Payload(payload(id, &format!("pokemon-{id}"))));
        }
        catalog
    }

    pub fn declaring_count(mut self, count: u64) -> Self {
        self.declared = Some(count);
        self
    }

    pub fn failing_root(mut self) -> Self {
        self.root_fails = true;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    pub fn detail(mut self, id: &str, payload: PokemonPayload) -> Self {
        self.details.insert(id.to_string(), Detail::Payload(payload));
        self
    }

    pub fn detail_status(mut self, id: &str, status: u16) -> Self {
        self.details.insert(id.to_string(), Detail::Status(status));
        self
    }

    pub fn detail_transport_error(mut self, id: &str) -> Self {
        self.details.insert(id.to_string(), Detail::Transport);
        self
    }

    pub fn detail_decode_error(mut self, id: &str) -> Self {
        self.details.insert(id.to_string(), Detail::Decode);
        self
    }

    pub fn listing_limits(&self) -> Vec<u64> {
        self.listing_limits.lock().unwrap().clone()
    }

    /// Detail ids requested so far, in request order
    pub fn detail_requests(&self) -> Vec<String> {
        self.detail_requests.lock().unwrap().clone()
    }
}

fn url_for(path: &str) -> String {
    format!("https://pokeapi.co/api/v2/pokemon{path}")
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_catalog_root(&self) -> Result<CatalogPage, SourceError> {
        if self.root_fails {
            return Err(SourceError::Transport {
                url: url_for(""),
                message: "connection refused".into(),
            });
        }
        Ok(CatalogPage {
            count: self.declared.unwrap_or(self.urls.len() as u64),
            results: Vec::new(),
        })
    }

    async fn fetch_listing(&self, limit: u64) -> Result<CatalogPage, SourceError> {
        self.listing_limits.lock().unwrap().push(limit);
        if self.listing_fails {
            return Err(SourceError::Status {
                url: url_for(&format!("?limit={limit}")),
                status: 503,
            });
        }
        Ok(CatalogPage {
            count: self.declared.unwrap_or(self.urls.len() as u64),
            results: self
                .urls
                .iter()
                .enumerate()
                .map(|(i, url)| NamedResource {
                    name: format!("entry-{i}"),
                    url: Some(url.clone()),
                })
                .collect(),
        })
    }

    async fn fetch_detail(&self, id: &EntityId) -> Result<PokemonPayload, SourceError> {
        self.detail_requests.lock().unwrap().push(id.to_string());
        let url = url_for(&format!("/{id}"));
        match self.details.get(id.as_str()).cloned() {
            Some(Detail::Payload(payload)) => Ok(payload),
            Some(Detail::Status(status)) => Err(SourceError::Status { url, status }),
            Some(Detail::Transport) => Err(SourceError::Transport {
                url,
                message: "operation timed out".into(),
            }),
            Some(Detail::Decode) => Err(SourceError::Decode {
                url,
                message: "missing field `name`".into(),
            }),
            None => Err(SourceError::Status { url, status: 404 }),
        }
    }
}

/// Store that keeps reconciled payloads in memory and can be told to fail
#[derive(Clone, Default)]
pub struct MemoryRepository {
    stored: Arc<Mutex<Vec<PokemonPayload>>>,
    reconciled: Arc<Mutex<Vec<i64>>>,
    fail_on: Option<i64>,
}

impl MemoryRepository {
    pub fn failing_on(id: i64) -> Self {
        Self {
            fail_on: Some(id),
            ..Self::default()
        }
    }

    /// Ids passed to `reconcile`, in call order
    pub fn reconciled_ids(&self) -> Vec<i64> {
        self.reconciled.lock().unwrap().clone()
    }
}

#[async_trait]
impl PokemonRepository for MemoryRepository {
    async fn reconcile(&self, payload: &PokemonPayload) -> Result<UpsertKind, RepositoryError> {
        self.reconciled.lock().unwrap().push(payload.id);
        if self.fail_on == Some(payload.id) {
            return Err(RepositoryError::InvalidData("injected failure".into()));
        }

        let mut stored = self.stored.lock().unwrap();
        if let Some(existing) = stored.iter_mut().find(|p| p.id == payload.id) {
            *existing = payload.clone();
            Ok(UpsertKind::Updated)
        } else {
            stored.push(payload.clone());
            Ok(UpsertKind::Created)
        }
    }

    async fn list_names(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .stored
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.name.clone())
            .collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<PokemonDetails>, RepositoryError> {
        Ok(self
            .stored
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .map(|p| PokemonDetails {
                pokemon: p.into(),
                abilities: p.ability_records().collect(),
                types: p.type_records().collect(),
                stats: p.stat_records().collect(),
            }))
    }

    async fn table_counts(&self) -> Result<TableCounts, RepositoryError> {
        let stored = self.stored.lock().unwrap();
        Ok(TableCounts {
            pokemon: stored.len() as i64,
            abilities: stored.iter().map(|p| p.abilities.len() as i64).sum(),
            types: stored.iter().map(|p| p.types.len() as i64).sum(),
            stats: stored.iter().map(|p| p.stats.len() as i64).sum(),
        })
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    seen: Mutex<Vec<SyncProgress>>,
}

impl RecordingObserver {
    pub fn percentages(&self) -> Vec<f64> {
        self.seen.lock().unwrap().iter().map(|p| p.percentage).collect()
    }

    pub fn processed(&self) -> Vec<usize> {
        self.seen.lock().unwrap().iter().map(|p| p.processed).collect()
    }
}

impl ProgressObserver for RecordingObserver {
    fn on_progress(&self, progress: &SyncProgress) {
        self.seen.lock().unwrap().push(*progress);
    }
}
