//! Pokemon entities: the upstream detail payload and the stored records

use serde::{Deserialize, Serialize};

/// `{ "name": ..., "url": ... }` reference used throughout the upstream API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl NamedResource {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
        }
    }
}

/// Collection root / listing page of `GET /pokemon[?limit=N]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub count: u64,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub type_: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSlot {
    pub stat: NamedResource,
    pub effort: i64,
    pub base_stat: i64,
}

/// Detail payload of `GET /pokemon/{id}`
///
/// Only the fields the mirror stores are decoded; everything else in the
/// upstream document is ignored. `height`, `weight` and `base_experience`
/// are nullable upstream and a `null` is written through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonPayload {
    pub id: i64,
    pub name: String,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    pub base_experience: Option<i64>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
}

/// Parent row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub pokemon_id: i64,
    pub pokemon_name: String,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    pub base_experience: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonAbility {
    pub ability_name: String,
    pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonType {
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat_name: String,
    pub effort: i64,
    pub base_stat_num: i64,
}

/// Parent row together with its three child collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonDetails {
    #[serde(flatten)]
    pub pokemon: Pokemon,
    pub abilities: Vec<PokemonAbility>,
    pub types: Vec<PokemonType>,
    pub stats: Vec<PokemonStat>,
}

impl From<&PokemonPayload> for Pokemon {
    fn from(payload: &PokemonPayload) -> Self {
        Self {
            pokemon_id: payload.id,
            pokemon_name: payload.name.clone(),
            height: payload.height,
            weight: payload.weight,
            base_experience: payload.base_experience,
        }
    }
}

impl PokemonPayload {
    pub fn ability_records(&self) -> impl Iterator<Item = PokemonAbility> + '_ {
        self.abilities.iter().map(|slot| PokemonAbility {
            ability_name: slot.ability.name.clone(),
            is_hidden: slot.is_hidden,
        })
    }

    pub fn type_records(&self) -> impl Iterator<Item = PokemonType> + '_ {
        self.types.iter().map(|slot| PokemonType {
            type_name: slot.type_.name.clone(),
        })
    }

    pub fn stat_records(&self) -> impl Iterator<Item = PokemonStat> + '_ {
        self.stats.iter().map(|slot| PokemonStat {
            base_stat_name: slot.stat.name.clone(),
            effort: slot.effort,
            base_stat_num: slot.base_stat,
        })
    }
}
