//! Configuration infrastructure
//!
//! Configuration is a single JSON document organised in four sections:
//! 1. `upstream` - where the catalog lives and how to talk to it
//! 2. `sync` - progress granularity and worker pool size
//! 3. `database` - the local SQLite store
//! 4. `logging` - tracing output
//!
//! `ConfigManager` reads the file (creating it with defaults on first run) and
//! layers `POKEDEX_MIRROR__<SECTION>__<KEY>` environment overrides on top.

#![allow(clippy::derivable_impls)]

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Prefix for environment overrides, e.g. `POKEDEX_MIRROR__SYNC__MAX_CONCURRENCY=4`
pub const ENV_PREFIX: &str = "POKEDEX_MIRROR";

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub sync: SyncConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Upstream catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Collection root, e.g. `https://pokeapi.co/api/v2/pokemon`
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    pub user_agent: String,

    pub follow_redirects: bool,
}

/// Sync engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Emit a progress observation after every N processed identifiers
    pub progress_interval: usize,

    /// Identifiers fetched and reconciled concurrently (1 = strictly sequential)
    pub max_concurrency: usize,

    /// Interval used by `sync --every` when no value is given on the command line
    pub schedule_interval_seconds: u64,
}

/// Local store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL, e.g. `sqlite:///home/me/.local/share/pokedex-mirror/pokedex.db`
    pub url: String,

    pub max_connections: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs in the log file
    pub json_format: bool,

    pub console_output: bool,

    pub file_output: bool,

    /// Directory for log files; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    /// Number of log files to keep (older files are deleted on startup)
    pub max_files: u32,

    /// Module-specific log level filters (e.g., "sqlx": "warn", "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upstream: UpstreamConfig::default(),
            sync: SyncConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::POKEAPI_BASE_URL.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            follow_redirects: true,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            progress_interval: defaults::PROGRESS_INTERVAL,
            max_concurrency: defaults::MAX_CONCURRENCY,
            schedule_interval_seconds: defaults::SCHEDULE_INTERVAL_SECONDS,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let path = ConfigManager::get_app_data_dir()
            .map_or_else(|_| PathBuf::from(defaults::DATABASE_FILE), |dir| dir.join(defaults::DATABASE_FILE));
        Self {
            url: format!("sqlite://{}", path.display()),
            max_connections: defaults::DB_MAX_CONNECTIONS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
            max_files: defaults::LOG_MAX_FILES,
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("sqlx".to_string(), "warn".to_string());
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("tokio".to_string(), "info".to_string());
                filters
            },
        }
    }
}

impl AppConfig {
    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.upstream.base_url)
            .with_context(|| format!("Invalid upstream.base_url: {}", self.upstream.base_url))?;

        if self.upstream.timeout_seconds == 0 {
            bail!("upstream.timeout_seconds must be greater than 0");
        }
        if self.sync.progress_interval == 0 {
            bail!("sync.progress_interval must be greater than 0");
        }
        if self.sync.max_concurrency == 0 {
            bail!("sync.max_concurrency must be greater than 0");
        }
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be greater than 0");
        }
        Ok(())
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Get application data directory (database lives here by default)
    pub fn get_app_data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .context("Failed to get user data directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(data_dir)
    }

    /// Configuration manager for the per-user config file
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join(defaults::CONFIG_FILE);
        Ok(Self { config_path })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    /// Load configuration from file, creating a default one if it doesn't exist,
    /// then apply environment overrides and validate
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            self.save_config(&AppConfig::default()).await?;
        }

        let config = Self::layered(&self.config_path)?;
        config.validate()?;
        info!("Loaded configuration from: {:?}", self.config_path);
        Ok(config)
    }

    fn layered(path: &Path) -> Result<AppConfig> {
        let settings = config::Config::builder()
            .add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Json,
            ))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Configuration file contains invalid settings")
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }
}

/// Default values
pub mod defaults {
    pub const APP_DIR_NAME: &str = "pokedex-mirror";

    pub const CONFIG_FILE: &str = "config.json";

    pub const DATABASE_FILE: &str = "pokedex.db";

    /// Collection root of the upstream catalog
    pub const POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2/pokemon";

    pub const USER_AGENT: &str = "pokedex-mirror/0.1";

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Progress is reported every 20 processed identifiers
    pub const PROGRESS_INTERVAL: usize = 20;

    pub const MAX_CONCURRENCY: usize = 1;

    /// Daily refresh
    pub const SCHEDULE_INTERVAL_SECONDS: u64 = 24 * 60 * 60;

    pub const DB_MAX_CONNECTIONS: u32 = 5;

    pub const LOG_LEVEL: &str = "info";

    pub const LOG_MAX_FILES: u32 = 7;
}
