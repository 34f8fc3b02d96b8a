use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "POSTGEO_GEOCODING_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file holding the post collection
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_database() -> String {
    "postgeo.sqlite3".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Without a key, locations are resolved from place data only
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    geocoding_adapter::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    "maps".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Words pointing at a denier post
    #[serde(default = "default_positive_keywords")]
    pub positive_keywords: Vec<String>,
    /// Words pointing at an acceptor post
    #[serde(default = "default_negative_keywords")]
    pub negative_keywords: Vec<String>,
}

fn default_positive_keywords() -> Vec<String> {
    ["hoax", "coronahoax", "scam", "coronascam", "fake", "fakecorona", "plandemic"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

fn default_negative_keywords() -> Vec<String> {
    ["stayhome", "stayathome", "vaccine", "staysafe", "flattenthecurve", "lockdown"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            positive_keywords: default_positive_keywords(),
            negative_keywords: default_negative_keywords(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.storage.database.trim().is_empty() {
            bail!("storage.database must not be empty");
        }
        if self.geocoding.timeout_secs == 0 {
            bail!("geocoding.timeout_secs must be greater than 0");
        }
        Ok(())
    }

    /// API key from the environment, falling back to the config file
    pub fn geocoding_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .or_else(|| self.geocoding.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Get the default config file path (~/.config/postgeo/config.toml)
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("postgeo").join("config.toml"))
}

/// Load configuration from file, or return defaults if not found
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    config
        .validate()
        .with_context(|| format!("Invalid config: {:?}", path))?;
    Ok(config)
}
