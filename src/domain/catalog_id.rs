//! Catalog identifiers and extraction from resource URLs
//!
//! Listing entries reference items as `.../pokemon/<id>/`. The identifier is
//! kept as the exact digit string found in the URL so that discovery output
//! matches the upstream listing byte for byte.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TRAILING_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(\d+)/$").expect("trailing id pattern is valid"));

/// Upstream identifier of one catalog entity (non-empty ASCII digits)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Returns `None` unless `raw` is a non-empty run of ASCII digits
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(raw))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of extracting an identifier from a resource URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdLookup {
    Found(EntityId),
    NotFound,
}

impl IdLookup {
    pub const fn as_found(&self) -> Option<&EntityId> {
        match self {
            Self::Found(id) => Some(id),
            Self::NotFound => None,
        }
    }

    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl fmt::Display for IdLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(id) => write!(f, "{id}"),
            Self::NotFound => f.write_str("<no id>"),
        }
    }
}

/// Extract the numeric segment immediately preceding the final `/`
pub fn extract_entity_id(url: &str) -> IdLookup {
    TRAILING_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| EntityId::new(m.as_str()))
        .map_or(IdLookup::NotFound, IdLookup::Found)
}
