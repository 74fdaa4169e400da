//! Command-line front end

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::application::AppState;
use crate::commands::{
    get_database_status, get_pokemon_details, list_pokemon_names, run_scheduled_sync,
    trigger_sync,
};
use crate::infrastructure::config::{AppConfig, ConfigManager};
use crate::infrastructure::logging::{init_logging_with_config, log_system_info};

#[derive(Parser, Debug)]
#[command(
    name = "pokedex-mirror",
    version,
    about = "Mirror the PokeAPI pokemon catalog into a local SQLite database."
)]
pub struct Cli {
    /// Configuration file (defaults to the per-user config directory).
    #[arg(long, global = true, env = "POKEDEX_MIRROR_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// SQLite URL overriding `database.url`, e.g. sqlite://./pokedex.db
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fetch every pokemon from the upstream catalog and upsert it locally.
    Sync {
        /// Keep running and re-sync every SECS seconds; without a value the
        /// configured `sync.schedule_interval_seconds` is used.
        #[arg(long, value_name = "SECS", num_args = 0..=1)]
        every: Option<Option<u64>>,
    },
    /// Print all stored pokemon names, sorted case-insensitively.
    List,
    /// Print one pokemon with its abilities, types and stats.
    Show {
        /// Exact pokemon name as stored, e.g. bulbasaur
        name: String,
    },
    /// Print row counts for every table.
    Status,
}

impl Cli {
    /// Resolve the effective configuration for this invocation
    pub async fn load_config(&self) -> Result<AppConfig> {
        let manager = match &self.config {
            Some(path) => ConfigManager::with_path(path),
            None => ConfigManager::new()?,
        };
        let mut config = manager.load_config().await?;
        if let Some(url) = &self.database_url {
            config.database.url.clone_from(url);
        }
        Ok(config)
    }
}

/// Execute a parsed command line; the returned error is what the user sees
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config().await?;
    init_logging_with_config(&config.logging)?;
    log_system_info();

    let state = AppState::initialize(config).await?;

    let token = state.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("🛑 Interrupt received, cancelling");
            token.cancel();
        }
    });

    match cli.command {
        Command::Sync { every: None } => print_json(&trigger_sync(&state).await?),
        Command::Sync { every: Some(secs) } => {
            let secs = secs.unwrap_or(state.config.sync.schedule_interval_seconds);
            let runs = run_scheduled_sync(&state, Duration::from_secs(secs.max(1))).await;
            info!("Scheduled sync finished after {} runs", runs);
            Ok(())
        }
        Command::List => print_json(&list_pokemon_names(&state).await?),
        Command::Show { name } => print_json(&get_pokemon_details(&state, &name).await?),
        Command::Status => print_json(&get_database_status(&state).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{rendered}");
    Ok(())
}
