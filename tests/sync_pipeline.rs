//! Full sync against an in-memory catalog and an on-disk SQLite store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pokedex_mirror_lib::application::{AppState, NoopProgressObserver};
use pokedex_mirror_lib::commands::{
    CommandError, get_pokemon_details, list_pokemon_names, trigger_sync,
};
use pokedex_mirror_lib::domain::pokemon::{AbilitySlot, NamedResource, StatSlot, TypeSlot};
use pokedex_mirror_lib::domain::{
    CatalogPage, CatalogSource, EntityId, PokemonPayload, SourceError, TableCounts,
};
use pokedex_mirror_lib::infrastructure::config::AppConfig;
use pokedex_mirror_lib::infrastructure::{DatabaseConnection, SqlitePokemonRepository};
use serde_json::json;
use tempfile::TempDir;

#[derive(Default)]
struct StaticCatalog {
    listing: Vec<String>,
    details: Mutex<HashMap<String, PokemonPayload>>,
}

impl StaticCatalog {
    fn new(payloads: Vec<PokemonPayload>) -> Self {
        let listing = payloads
            .iter()
            .map(|p| format!("https://pokeapi.co/api/v2/pokemon/{}/", p.id))
            .collect();
        let details = payloads.into_iter().map(|p| (p.id.to_string(), p)).collect();
        Self {
            listing,
            details: Mutex::new(details),
        }
    }

    fn replace(&self, payload: PokemonPayload) {
        self.details
            .lock()
            .unwrap()
            .insert(payload.id.to_string(), payload);
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_catalog_root(&self) -> Result<CatalogPage, SourceError> {
        Ok(CatalogPage {
            count: self.listing.len() as u64,
            results: Vec::new(),
        })
    }

    async fn fetch_listing(&self, limit: u64) -> Result<CatalogPage, SourceError> {
        Ok(CatalogPage {
            count: self.listing.len() as u64,
            results: self
                .listing
                .iter()
                .take(limit as usize)
                .map(|url| NamedResource {
                    name: String::new(),
                    url: Some(url.clone()),
                })
                .collect(),
        })
    }

    async fn fetch_detail(&self, id: &EntityId) -> Result<PokemonPayload, SourceError> {
        self.details
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| SourceError::Status {
                url: format!("https://pokeapi.co/api/v2/pokemon/{id}"),
                status: 404,
            })
    }
}

fn bulbasaur() -> PokemonPayload {
    PokemonPayload {
        id: 1,
        name: "Bulbasaur".into(),
        height: Some(7),
        weight: Some(69),
        base_experience: Some(64),
        abilities: vec![AbilitySlot {
            ability: NamedResource::named("chlorophyll"),
            is_hidden: false,
        }],
        types: vec![TypeSlot {
            type_: NamedResource::named("grass"),
        }],
        stats: vec![StatSlot {
            stat: NamedResource::named("speed"),
            effort: 0,
            base_stat: 45,
        }],
    }
}

fn simple(id: i64, name: &str) -> PokemonPayload {
    PokemonPayload {
        id,
        name: name.into(),
        height: None,
        weight: None,
        base_experience: None,
        abilities: Vec::new(),
        types: vec![TypeSlot {
            type_: NamedResource::named("normal"),
        }],
        stats: Vec::new(),
    }
}

async fn state_for(catalog: Arc<StaticCatalog>) -> (TempDir, AppState) {
    state_with_setup(catalog, &[]).await
}

/// Like `state_for`, running extra SQL against the fresh schema first
async fn state_with_setup(catalog: Arc<StaticCatalog>, setup: &[&str]) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.database.url = format!("sqlite:{}", dir.path().join("pokedex.db").display());

    let db = DatabaseConnection::from_config(&config.database).await.unwrap();
    db.migrate().await.unwrap();
    for statement in setup {
        sqlx::query(statement).execute(db.pool()).await.unwrap();
    }
    let repository = Arc::new(SqlitePokemonRepository::new(db.pool().clone()));

    let state = AppState::new(config, catalog, repository, Arc::new(NoopProgressObserver));
    (dir, state)
}

#[tokio::test]
async fn bulbasaur_round_trips_through_a_full_sync() {
    let catalog = Arc::new(StaticCatalog::new(vec![bulbasaur()]));
    let (_dir, state) = state_for(catalog).await;

    let response = trigger_sync(&state).await.unwrap();
    let details = get_pokemon_details(&state, "Bulbasaur").await.unwrap();

    assert_eq!(response.message, "Data update successful.");
    assert_eq!(
        serde_json::to_value(&details).unwrap(),
        json!({
            "pokemon_id": 1,
            "pokemon_name": "Bulbasaur",
            "height": 7,
            "weight": 69,
            "base_experience": 64,
            "abilities": [{"ability_name": "chlorophyll", "is_hidden": false}],
            "types": [{"type_name": "grass"}],
            "stats": [{"base_stat_name": "speed", "effort": 0, "base_stat_num": 45}]
        })
    );
}

#[tokio::test]
async fn repeated_sync_leaves_the_store_unchanged() {
    let catalog = Arc::new(StaticCatalog::new(vec![
        bulbasaur(),
        simple(19, "rattata"),
        simple(25, "Pikachu"),
    ]));
    let (_dir, state) = state_for(catalog).await;

    let first = trigger_sync(&state).await.unwrap();
    let counts = state.queries.table_counts().await.unwrap();
    let second = trigger_sync(&state).await.unwrap();

    assert_eq!(first.report.created, 3);
    assert_eq!(second.report.created, 0);
    assert_eq!(second.report.reconciled, 3);
    assert_eq!(
        counts,
        TableCounts {
            pokemon: 3,
            abilities: 1,
            types: 3,
            stats: 1
        }
    );
    assert_eq!(state.queries.table_counts().await.unwrap(), counts);
    assert_eq!(
        list_pokemon_names(&state).await.unwrap().pokemon_names,
        vec!["Bulbasaur", "Pikachu", "rattata"]
    );
}

#[tokio::test]
async fn upstream_changes_overwrite_parent_fields() {
    let catalog = Arc::new(StaticCatalog::new(vec![bulbasaur()]));
    let (_dir, state) = state_for(catalog.clone()).await;
    trigger_sync(&state).await.unwrap();

    let mut evolved = bulbasaur();
    evolved.weight = Some(70);
    evolved.base_experience = None;
    evolved.stats[0].base_stat = 46;
    catalog.replace(evolved);
    trigger_sync(&state).await.unwrap();

    let details = get_pokemon_details(&state, "Bulbasaur").await.unwrap();
    assert_eq!(details.pokemon.weight, Some(70));
    assert_eq!(details.pokemon.base_experience, None);
    assert_eq!(details.stats[0].base_stat_num, 46);
    assert_eq!(state.queries.table_counts().await.unwrap().stats, 1);
}

#[tokio::test]
async fn storage_failure_reports_unavailable_and_keeps_earlier_entities() {
    let mut broken = simple(2, "ivysaur");
    broken.stats.push(StatSlot {
        stat: NamedResource::named("attack"),
        effort: 0,
        base_stat: 60,
    });
    let catalog = Arc::new(StaticCatalog::new(vec![bulbasaur(), broken, simple(3, "venusaur")]));
    let (_dir, state) = state_with_setup(
        catalog,
        &["CREATE TRIGGER reject_attack BEFORE INSERT ON pokemon_stats
           WHEN NEW.stat_name = 'attack'
           BEGIN SELECT RAISE(ABORT, 'rejected stat'); END"],
    )
    .await;

    let err = trigger_sync(&state).await.unwrap_err();

    assert_eq!(err, CommandError::SourceUnavailable);
    assert_eq!(
        list_pokemon_names(&state).await.unwrap().pokemon_names,
        vec!["Bulbasaur"]
    );
    assert_eq!(
        get_pokemon_details(&state, "ivysaur").await.unwrap_err(),
        CommandError::NotFound("ivysaur".into())
    );
}
