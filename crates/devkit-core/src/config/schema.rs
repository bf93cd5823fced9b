//! devkit.toml schema.

use serde::{Deserialize, Serialize};

use crate::locator::DEFAULT_HOST;

/// Default hosted service API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com/";

/// User configuration for devkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevkitConfig {
    /// Owner for unqualified project names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Where to load the project list from (file:// or https://)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects_url: Option<String>,

    /// Repository host for resolving names
    #[serde(default = "default_host")]
    pub host: String,

    /// Hosted service API root
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Read URL scheme rules from this git config file instead of the
    /// user's merged configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_config: Option<String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for DevkitConfig {
    fn default() -> Self {
        Self {
            owner: None,
            projects_url: None,
            host: default_host(),
            api_url: default_api_url(),
            git_config: None,
        }
    }
}

impl DevkitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a devkit.toml document.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
