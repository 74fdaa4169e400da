//! Pokedex Mirror - keeps a local SQLite copy of the PokeAPI pokemon catalog
//!
//! A sync run discovers every pokemon id upstream, fetches each detail
//! document and upserts the pokemon with its abilities, types and stats in
//! one transaction per pokemon. The mirrored data can then be listed and
//! looked up by name.

pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infrastructure;

pub use cli::{Cli, run};
