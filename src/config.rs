//! Application configuration.
//!
//! A JSON config file at the platform config directory makes the movies
//! roots, catalog path and remote settings optional on the command line.
//! A missing or unreadable file falls back to defaults; CLI flags always
//! override config values.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Remote store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the remote store (`https://host[:port]`).
    #[serde(default)]
    pub server: Option<String>,
    /// Username for basic auth.
    #[serde(default)]
    pub user: Option<String>,
    /// Database name on the remote store.
    #[serde(default)]
    pub database: Option<String>,
    /// Connect without credentials.
    #[serde(default)]
    pub no_auth: bool,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directories holding movie subdirectories.
    #[serde(default)]
    pub movies_dirs: Vec<PathBuf>,
    /// Path to the local catalog mirror.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Remote store settings.
    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save the configuration to the default platform-specific path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "reelsync", "reelsync")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}
