//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger behaviour configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Prefix of human-readable entry numbers, e.g. `JE-`.
    #[serde(default = "default_entry_number_prefix")]
    pub entry_number_prefix: String,
    /// Zero-padded width of the numeric part of an entry number.
    #[serde(default = "default_entry_number_width")]
    pub entry_number_width: usize,
}

fn default_entry_number_prefix() -> String {
    "JE-".to_string()
}

fn default_entry_number_width() -> usize {
    6
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            entry_number_prefix: default_entry_number_prefix(),
            entry_number_width: default_entry_number_width(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from `.env`, config files and `TALLY__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
