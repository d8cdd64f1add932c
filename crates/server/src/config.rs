//! # Application Configuration
//!
//! Loads the `geosql-server` configuration from built-in defaults, an optional
//! `config.yml`, and environment variables, in that order of precedence.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use geosql::constants::{
    DEFAULT_MONGO_COLLECTION, DEFAULT_MONGO_DATABASE, DEFAULT_MONGO_URI, SQLAI_API_URL,
};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds a query session may sit unused before it is closed.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
    /// Where the restaurant documents live.
    pub mongo: MongoConfig,
    /// The text-to-SQL service.
    pub text_to_sql: TextToSqlConfig,
}

fn default_port() -> u16 {
    9090
}

fn default_session_idle_secs() -> u64 {
    1800
}

#[derive(Debug, Deserialize, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TextToSqlConfig {
    pub api_url: String,
}

// Reads a file and substitutes `${VAR}` references from the environment.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration.
///
/// - Layer 1: defaults (local MongoDB `geo.restaurant`, public SQL.AI endpoint).
/// - Layer 2: `config.yml` next to the crate, or the file passed explicitly.
/// - Layer 3: top-level environment variables such as `PORT` or
///   `SESSION_IDLE_SECS`.
/// - Layer 4: `GEOSQL_` prefixed variables with `__` nesting
///   (e.g. `GEOSQL_MONGO__URI`, `GEOSQL_TEXT_TO_SQL__API_URL`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder()
        .set_default("port", i64::from(default_port()))?
        .set_default("session_idle_secs", 1800_i64)?
        .set_default("mongo.uri", DEFAULT_MONGO_URI)?
        .set_default("mongo.database", DEFAULT_MONGO_DATABASE)?
        .set_default("mongo.collection", DEFAULT_MONGO_COLLECTION)?
        .set_default("text_to_sql.api_url", SQLAI_API_URL)?;

    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let user_config_path = format!("{}/config.yml", env!("CARGO_MANIFEST_DIR"));
            if let Some(content) = read_and_substitute(&user_config_path)? {
                info!("Loading user-defined configuration from '{user_config_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            }
        }
    }

    let settings = builder
        .add_source(Environment::default().try_parsing(true).ignore_empty(true))
        .add_source(
            Environment::with_prefix("GEOSQL")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
