//! # Configuration Management
//!
//! Loads runtime settings from `msw-config.toml`: API credentials and HTTP
//! client settings in `[api]`, the surf spot to query in `[spot]`.
//!
//! ```toml
//! [api]
//! key = "your-api-key"
//! base_url = "https://magicseaweed.com"
//! user_agent = "msw-forecast/0.1.0"
//! timeout_secs = 30
//!
//! [spot]
//! id = "616"
//! name = "Pipeline"
//! latitude = 21.66
//! longitude = -158.05
//! units = "us"
//! fields = []
//! ```
//!
//! The `MSW_API_KEY` environment variable, when set and non-empty, takes
//! precedence over `api.key` so the key can stay out of the file.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::Unit;
use crate::client::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::error::{ForecastError, Result};
use crate::query::{Query, QueryBuilder, DEFAULT_BASE_URL};

/// Default config file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "msw-config.toml";

/// Environment variable overriding `api.key`.
pub const API_KEY_ENV: &str = "MSW_API_KEY";

/// Application configuration loaded from msw-config.toml
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub spot: SpotConfig,
}

/// Forecast API access
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API key embedded in the request path
    pub key: String,
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

/// Surf spot to forecast
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpotConfig {
    /// Spot id as shown in the spot's page URL (e.g. "616" for Pipeline)
    pub id: String,
    /// Human-readable spot name for reference
    pub name: String,
    /// Used for sunrise/sunset lookups
    pub latitude: f64,
    pub longitude: f64,
    /// `us`, `uk` or `eu`; empty means the spot's default units
    pub units: String,
    /// Field paths to request; empty requests everything
    pub fields: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for SpotConfig {
    fn default() -> Self {
        SpotConfig {
            id: "616".to_string(),
            name: "Pipeline".to_string(),
            latitude: 21.66,
            longitude: -158.05,
            units: String::new(),
            fields: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from msw-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let mut config = match Self::read(path) {
            Ok(config) => {
                info!(spot = %config.spot.name, "loaded configuration");
                config
            }
            Err(ForecastError::Config(reason)) if !path.exists() => {
                info!(path = %path.display(), %reason, "no config file found, using defaults");
                Self::default()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "invalid config file, using defaults");
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    /// Strict variant of [`load_from_path`](Self::load_from_path): any read or
    /// parse failure is returned instead of replaced by defaults.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ForecastError::Config(format!("{}: {e}", path.display())))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ForecastError::Config(e.to_string()))
    }

    /// Save current configuration to msw-config.toml
    pub fn save(&self) -> Result<()> {
        self.save_to_path(CONFIG_FILE)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents =
            toml::to_string_pretty(self).map_err(|e| ForecastError::Config(e.to_string()))?;
        fs::write(path, contents)
            .map_err(|e| ForecastError::Config(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    fn apply_env(&mut self) {
        self.apply_key_override(env::var(API_KEY_ENV).ok());
    }

    fn apply_key_override(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api.key = key.trim().to_string();
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Configured unit system, validated.
    pub fn units(&self) -> Result<Option<Unit>> {
        match self.spot.units.trim() {
            "" => Ok(None),
            code => code.parse().map(Some),
        }
    }

    /// Validated query for the configured spot.
    pub fn query(&self) -> Result<Query> {
        if self.api.key.trim().is_empty() {
            return Err(ForecastError::Config(format!(
                "no API key: set api.key or {API_KEY_ENV}"
            )));
        }
        let mut builder = QueryBuilder::new(self.api.key.trim(), &self.spot.id)
            .base_url(&self.api.base_url)
            .fields(&self.spot.fields);
        if let Some(units) = self.units()? {
            builder = builder.units(units.as_str());
        }
        builder.build()
    }
}
