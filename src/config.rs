//! TOML configuration.
//!
//! ```toml
//! [catalog]
//! path = "./data/sneakers_mock.json"
//!
//! [db]
//! path = "./data/sneakpeak.sqlite"
//!
//! [server]
//! bind = "0.0.0.0:8000"
//!
//! [trending]
//! default_limit = 10
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use sneakpeak_core::catalog::DEFAULT_TRENDING_LIMIT;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub trending: TrendingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// JSON file holding the catalog as an array of records.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrendingConfig {
    #[serde(default = "default_trending_limit")]
    pub default_limit: usize,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            default_limit: default_trending_limit(),
        }
    }
}

fn default_trending_limit() -> usize {
    DEFAULT_TRENDING_LIMIT
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.trending.default_limit == 0 {
        anyhow::bail!("trending.default_limit must be >= 1");
    }
    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }
    Ok(())
}
