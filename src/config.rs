//! Daemon configuration loaded from an optional TOML file.

use crate::model::POKEMON_COUNT;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key the roster blob is stored under in the workspace.
    pub storage_key: String,

    /// How long the feedback splash stays up.
    pub splash_ms: u64,

    pub draw_tick_ms: u64,
    pub draw_ticks: u32,

    /// Pause between the last spin and the committed draw.
    pub draw_settle_ms: u64,

    /// BCP-47 tag used to collate student names.
    pub collation_locale: String,

    pub pokemon_count: u32,

    /// Export files are named `<prefix>_<YYYY-MM-DD>.txt`.
    pub export_prefix: String,

    /// Fixed RNG seed for reproducible draws.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: "poke_class_data".to_string(),
            splash_ms: 1500,
            draw_tick_ms: 100,
            draw_ticks: 15,
            draw_settle_ms: 300,
            collation_locale: "zh-HK".to_string(),
            pokemon_count: POKEMON_COUNT,
            export_prefix: "Classes".to_string(),
            seed: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }
        if self.draw_ticks == 0 {
            return Err(ConfigError::Invalid("draw_ticks must be at least 1".into()));
        }
        if self.pokemon_count == 0 {
            return Err(ConfigError::Invalid(
                "pokemon_count must be at least 1".into(),
            ));
        }
        if self.export_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(
                "export_prefix must be a plain file name".into(),
            ));
        }
        Ok(())
    }
}
