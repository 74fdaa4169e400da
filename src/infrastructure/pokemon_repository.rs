//! SQLite implementation of `PokemonRepository`
//!
//! Reconciliation runs in one transaction per entity. Every statement is an
//! `INSERT ... ON CONFLICT` keyed on the natural key, so re-running a sync
//! with an unchanged upstream leaves row counts and contents untouched.
//! Children that disappeared upstream are left in place.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::trace;

use crate::domain::{
    Pokemon, PokemonAbility, PokemonDetails, PokemonPayload, PokemonRepository, PokemonStat,
    PokemonType, RepositoryError, TableCounts, UpsertKind,
};

const UPSERT_POKEMON: &str = r"
    INSERT INTO pokemon (pokemon_id, pokemon_name, height, weight, base_experience)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (pokemon_id) DO UPDATE SET
        pokemon_name = excluded.pokemon_name,
        height = excluded.height,
        weight = excluded.weight,
        base_experience = excluded.base_experience,
        synced_at = CURRENT_TIMESTAMP
";

const UPSERT_ABILITY: &str = r"
    INSERT INTO pokemon_abilities (pokemon_id, ability_name, is_hidden)
    VALUES ($1, $2, $3)
    ON CONFLICT (pokemon_id, ability_name) DO UPDATE SET is_hidden = excluded.is_hidden
";

const INSERT_TYPE: &str = r"
    INSERT INTO pokemon_types (pokemon_id, type_name)
    VALUES ($1, $2)
    ON CONFLICT (pokemon_id, type_name) DO NOTHING
";

const UPSERT_STAT: &str = r"
    INSERT INTO pokemon_stats (pokemon_id, stat_name, effort, base_stat)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (pokemon_id, stat_name) DO UPDATE SET
        effort = excluded.effort,
        base_stat = excluded.base_stat
";

pub struct SqlitePokemonRepository {
    pool: SqlitePool,
}

impl SqlitePokemonRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_pokemon(row: &SqliteRow) -> Result<Pokemon, RepositoryError> {
        Ok(Pokemon {
            pokemon_id: row.try_get("pokemon_id")?,
            pokemon_name: row.try_get("pokemon_name")?,
            height: row.try_get("height")?,
            weight: row.try_get("weight")?,
            base_experience: row.try_get("base_experience")?,
        })
    }

    async fn children_of(&self, pokemon_id: i64) -> Result<PokemonChildren, RepositoryError> {
        let abilities = sqlx::query(
            "SELECT ability_name, is_hidden FROM pokemon_abilities WHERE pokemon_id = $1 ORDER BY id",
        )
        .bind(pokemon_id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| -> Result<PokemonAbility, sqlx::Error> {
            Ok(PokemonAbility {
                ability_name: row.try_get("ability_name")?,
                is_hidden: row.try_get("is_hidden")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let types: Vec<PokemonType> = sqlx::query_scalar::<_, String>(
            "SELECT type_name FROM pokemon_types WHERE pokemon_id = $1 ORDER BY id",
        )
        .bind(pokemon_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|type_name| PokemonType { type_name })
        .collect();

        let stats = sqlx::query(
            "SELECT stat_name, effort, base_stat FROM pokemon_stats WHERE pokemon_id = $1 ORDER BY id",
        )
        .bind(pokemon_id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| -> Result<PokemonStat, sqlx::Error> {
            Ok(PokemonStat {
                base_stat_name: row.try_get("stat_name")?,
                effort: row.try_get("effort")?,
                base_stat_num: row.try_get("base_stat")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok((abilities, types, stats))
    }
}

type PokemonChildren = (Vec<PokemonAbility>, Vec<PokemonType>, Vec<PokemonStat>);

#[async_trait]
impl PokemonRepository for SqlitePokemonRepository {
    async fn reconcile(&self, payload: &PokemonPayload) -> Result<UpsertKind, RepositoryError> {
        // Take the write lock up front; a deferred transaction that reads first
        // cannot be upgraded while other writers hold the database.
        // Dropping `tx` on an early return rolls everything back.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let existed: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pokemon WHERE pokemon_id = $1)")
                .bind(payload.id)
                .fetch_one(&mut *tx)
                .await?;

        let parent = Pokemon::from(payload);
        sqlx::query(UPSERT_POKEMON)
            .bind(parent.pokemon_id)
            .bind(&parent.pokemon_name)
            .bind(parent.height)
            .bind(parent.weight)
            .bind(parent.base_experience)
            .execute(&mut *tx)
            .await?;

        for ability in payload.ability_records() {
            sqlx::query(UPSERT_ABILITY)
                .bind(payload.id)
                .bind(&ability.ability_name)
                .bind(ability.is_hidden)
                .execute(&mut *tx)
                .await?;
        }

        for pokemon_type in payload.type_records() {
            sqlx::query(INSERT_TYPE)
                .bind(payload.id)
                .bind(&pokemon_type.type_name)
                .execute(&mut *tx)
                .await?;
        }

        for stat in payload.stat_records() {
            sqlx::query(UPSERT_STAT)
                .bind(payload.id)
                .bind(&stat.base_stat_name)
                .bind(stat.effort)
                .bind(stat.base_stat_num)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        trace!(pokemon_id = payload.id, created = !existed, "Reconciled pokemon");
        Ok(if existed {
            UpsertKind::Updated
        } else {
            UpsertKind::Created
        })
    }

    async fn list_names(&self) -> Result<Vec<String>, RepositoryError> {
        let names: Vec<String> = sqlx::query_scalar("SELECT pokemon_name FROM pokemon ORDER BY pokemon_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<PokemonDetails>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT pokemon_id, pokemon_name, height, weight, base_experience
             FROM pokemon WHERE pokemon_name = $1 ORDER BY pokemon_id LIMIT 2",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        let row = match rows.as_slice() {
            [] => return Ok(None),
            [row] => row,
            _ => {
                return Err(RepositoryError::InvalidData(format!(
                    "more than one pokemon named '{name}'"
                )));
            }
        };

        let pokemon = Self::row_to_pokemon(row)?;
        let (abilities, types, stats) = self.children_of(pokemon.pokemon_id).await?;

        Ok(Some(PokemonDetails {
            pokemon,
            abilities,
            types,
            stats,
        }))
    }

    async fn table_counts(&self) -> Result<TableCounts, RepositoryError> {
        let row = sqlx::query(
            "SELECT
                (SELECT COUNT(*) FROM pokemon) AS pokemon,
                (SELECT COUNT(*) FROM pokemon_abilities) AS abilities,
                (SELECT COUNT(*) FROM pokemon_types) AS types,
                (SELECT COUNT(*) FROM pokemon_stats) AS stats",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(TableCounts {
            pokemon: row.try_get("pokemon")?,
            abilities: row.try_get("abilities")?,
            types: row.try_get("types")?,
            stats: row.try_get("stats")?,
        })
    }
}
