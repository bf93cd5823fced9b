//! Config store for loading and saving devkit.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::DevkitConfig;

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "devkit.toml";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Store at the platform config directory (`~/.config/devkit/devkit.toml`).
    pub fn from_default_dir() -> anyhow::Result<Self> {
        let config_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("devkit");
        Ok(Self::from_dir(&config_dir))
    }

    pub fn from_dir(config_dir: &Path) -> Self {
        Self::from_path(config_dir.join(CONFIG_FILE_NAME))
    }

    pub fn from_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the config, falling back to defaults when the file is missing.
    pub fn load(&self) -> anyhow::Result<DevkitConfig> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "No config file, using defaults");
            return Ok(DevkitConfig::new());
        }
        let content = std::fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;
        DevkitConfig::from_toml_str(&content).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })
    }

    pub fn save(&self, config: &DevkitConfig) -> anyhow::Result<()> {
        let content = config
            .to_toml()
            .context("Failed to serialize config to TOML")?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;
        Ok(())
    }
}
