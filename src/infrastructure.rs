//! Infrastructure layer: configuration, logging, SQLite storage and the
//! HTTP-backed upstream catalog

pub mod config;
pub mod database_connection;
pub mod http_client;
pub mod logging;
pub mod pokeapi_client;
pub mod pokemon_repository;

#[cfg(test)]
pub(crate) mod stub_server;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager};
pub use database_connection::DatabaseConnection;
pub use http_client::{HttpClient, HttpClientConfig};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use pokeapi_client::PokeApiClient;
pub use pokemon_repository::SqlitePokemonRepository;
