//! TOML configuration.
//!
//! Every setting has a default matching the stock catalog run, so the
//! binary works without a config file. When `--config` is given the file
//! is parsed and validated by [`load_config`].
//!
//! ```toml
//! [source]
//! url = "https://fakestoreapi.com/products"
//! timeout_secs = 30
//!
//! [db]
//! path = "fakestore_advanced.db"
//!
//! [charts]
//! output_dir = "."
//! width = 800
//! height = 500
//! title_max_chars = 20
//!
//! [analytics]
//! top_products = 5
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub charts: ChartsConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Where the catalog is fetched from.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_url() -> String {
    "https://fakestoreapi.com/products".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("fakestore_advanced.db")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartsConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Longer product titles are cut to this many characters plus `...`.
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            width: default_width(),
            height: default_height(),
            title_max_chars: default_title_max_chars(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    500
}
fn default_title_max_chars() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    #[serde(default = "default_top_products")]
    pub top_products: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_products: default_top_products(),
        }
    }
}

fn default_top_products() -> i64 {
    5
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;

    Ok(config)
}

/// Resolve the effective config: the file when one is given, defaults otherwise.
pub fn resolve(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => load_config(p),
        None => Ok(Config::default()),
    }
}

fn validate(config: &Config) -> Result<()> {
    let url = &config.source.url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        anyhow::bail!("source.url must be an http(s) URL, got '{}'", url);
    }
    if config.source.timeout_secs == 0 {
        anyhow::bail!("source.timeout_secs must be > 0");
    }

    if config.charts.width == 0 || config.charts.height == 0 {
        anyhow::bail!("charts.width and charts.height must be > 0");
    }
    if config.charts.title_max_chars == 0 {
        anyhow::bail!("charts.title_max_chars must be > 0");
    }

    if config.analytics.top_products < 1 {
        anyhow::bail!("analytics.top_products must be >= 1");
    }

    Ok(())
}
