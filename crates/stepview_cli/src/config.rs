//! Stepview configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use stepview_algos::Preset;
use stepview_player::PlayerConfig;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "stepview.toml";

/// Top-level configuration (stepview.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StepviewConfig {
    #[serde(default)]
    pub playback: PlayerConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
}

/// Dataset every run is generated from
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    #[serde(default)]
    pub preset: Preset,
    #[serde(default = "default_size")]
    pub size: usize,
    #[serde(default = "default_min")]
    pub min: i64,
    #[serde(default = "default_max")]
    pub max: i64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_size() -> usize {
    32
}

fn default_min() -> i64 {
    5
}

fn default_max() -> i64 {
    100
}

fn default_seed() -> u64 {
    42
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            size: default_size(),
            min: default_min(),
            max: default_max(),
            seed: default_seed(),
        }
    }
}

impl DatasetConfig {
    /// Generate the configured dataset.
    pub fn generate(&self) -> Result<Vec<i64>> {
        self.preset
            .generate(self.size, self.min, self.max, self.seed)
            .with_context(|| format!("Failed to generate `{}` dataset", self.preset))
    }
}

impl StepviewConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `stepview.toml` in the
    /// working directory is used if present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) if path.is_dir() => path.join(CONFIG_FILE),
            Some(path) => path.to_path_buf(),
            None => {
                let local = Path::new(CONFIG_FILE);
                if !local.exists() {
                    tracing::debug!("no {CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                local.to_path_buf()
            }
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        tracing::debug!(path = %config_path.display(), "config loaded");
        Ok(config)
    }

    /// Parse and validate a config file's contents.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: StepviewConfig = toml::from_str(content)?;
        config
            .playback
            .validate()
            .context("Invalid [playback] section")?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
