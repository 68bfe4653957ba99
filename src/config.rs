//! Type-safe configuration loader using the `config` crate, sourced from
//! the process environment. All settings are loaded once at startup and are
//! immutable for the process lifetime.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Application settings, one field per environment variable:
/// `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`,
/// `DATA_TABLE`, `GEMINI_API_KEY` (all required, no defaults) and
/// `SAMPLE_COLUMN` (optional, default 1).
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Postgres host
    pub db_host: String,

    /// Postgres port
    pub db_port: u16,

    /// Database name
    pub db_name: String,

    /// Database user
    pub db_user: String,

    /// Database password
    pub db_password: String,

    /// Table to summarise, used verbatim in the fetch query
    pub data_table: String,

    /// Static bearer token for the analysis API
    pub gemini_api_key: String,

    /// Positional index of the column to analyse. The original program
    /// hard-coded index 1 as a placeholder; it is kept as a named setting
    /// with the same default rather than a magic number.
    #[serde(default = "default_sample_column")]
    pub sample_column: usize,
}

fn default_sample_column() -> usize {
    1
}

impl Settings {
    /// Load settings from the environment. Missing required variables or
    /// an unparseable `DB_PORT`/`SAMPLE_COLUMN` surface as `ConfigError`.
    pub fn new() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        cfg.try_deserialize()
    }
}
