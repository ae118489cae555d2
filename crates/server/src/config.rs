//! # Application Configuration
//!
//! This module defines the configuration structure for the `technews-server`
//! and the logic for loading it from an optional `config.yml` file and
//! environment variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use technews::MarkupSchema;
use technews_rss::FeedConfig;
use thiserror::Error;
use tracing::info;

static ENV_VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").expect("env substitution pattern is valid")
});

/// A custom error type for configuration issues.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    #[error("Configuration error: {0}")]
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    #[error("{0}")]
    NotFound(String),
}

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
    /// Feeds served by `/api/rss-feed`.
    #[serde(default)]
    pub feeds: FeedConfig,
    /// Where submitted content items are persisted.
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    /// Selectors used for embedded-markup answers.
    #[serde(default)]
    pub markup: MarkupSchema,
}

/// Provides a default value for the `port` field if not set in the environment.
fn default_port() -> u16 {
    5002
}

/// The REST endpoint of the content table.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    /// Per-request timeout, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:54321/rest/v1/content".to_string(),
            api_key: None,
            timeout_ms: 15_000,
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SubmissionConfig {
    /// How long a submission outcome stays visible, in milliseconds.
    pub reset_after_ms: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            reset_after_ms: 2000,
        }
    }
}

impl SubmissionConfig {
    pub fn reset_after(&self) -> Duration {
        Duration::from_millis(self.reset_after_ms)
    }
}

// Reads a file and substitutes `${VAR}` references with environment values.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let expanded_content = ENV_VAR_RE.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// Layers, later ones winning:
/// - built-in defaults,
/// - `config.yml` next to the crate manifest, or the file at
///   `config_path_override` (which must exist),
/// - top-level environment variables such as `PORT`,
/// - `TECHNEWS_`-prefixed variables for nested keys (e.g.
///   `TECHNEWS_STORE__API_URL`). `TECHNEWS_FEEDS__URLS` takes a
///   comma-separated list.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder().set_default("port", i64::from(default_port()))?;

    let config_path = match config_path_override {
        Some(path) => path.to_string(),
        None => format!("{}/config.yml", env!("CARGO_MANIFEST_DIR")),
    };
    match read_and_substitute(&config_path)? {
        Some(content) => {
            info!("Loading configuration from '{config_path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None if config_path_override.is_some() => {
            return Err(ConfigError::NotFound(format!(
                "Config file not found at '{config_path}'."
            )));
        }
        None => info!("'{config_path}' not found. Using defaults and environment."),
    }

    let settings = builder
        // Top-level keys like PORT.
        .add_source(Environment::default())
        // Prefixed variables for nested keys.
        .add_source(
            Environment::with_prefix("TECHNEWS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("feeds.urls"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
