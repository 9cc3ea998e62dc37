use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use placer::{DispatchConfig, PlacementConfig};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "cbplace.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {}: {source}", .config_path.display())]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {}: {source}", .config_path.display())]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub placement: PlacementConfig,
    pub dispatch: DispatchConfig,
}

impl Config {
    pub fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
            config_path: config_path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_path(config_path: &Path) -> Result<Option<Self>, ConfigError> {
        if !config_path.exists() {
            return Ok(None);
        }
        Self::read(config_path).map(Some)
    }

    /// An explicit path must exist; otherwise fall back to
    /// [`DEFAULT_CONFIG_FILE`] and then to built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::read(path)?,
            None => Self::load_from_path(Path::new(DEFAULT_CONFIG_FILE))?.unwrap_or_default(),
        };
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}
