//! Configuration Management
//!
//! Handles persistent configuration storage for distctl.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// JFrog Platform URL
    #[serde(default)]
    pub url: Option<String>,
    /// Access token for the platform
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("distctl").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Set URL and save
    pub fn set_url(&mut self, url: &str) -> Result<()> {
        self.url = Some(url.to_string());
        self.save()
    }

    /// Set access token and save
    pub fn set_access_token(&mut self, token: &str) -> Result<()> {
        self.access_token = Some(token.to_string());
        self.save()
    }
}
