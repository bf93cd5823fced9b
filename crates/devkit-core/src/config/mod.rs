//! Configuration for devkit.
//!
//! Settings come from `devkit.toml` in the user's config directory, with
//! environment variables taking precedence:
//! - `DEVKIT_OWNER` overrides `owner`
//! - `PROJECTS_LIST_URL` overrides `projects_url`
//! - `GITHUB_TOKEN` supplies the API token (never stored in the file)

pub mod schema;
pub mod store;

pub use schema::{DEFAULT_API_URL, DevkitConfig};
pub use store::{CONFIG_FILE_NAME, ConfigStore};

pub const OWNER_ENV: &str = "DEVKIT_OWNER";
pub const PROJECTS_LIST_URL_ENV: &str = "PROJECTS_LIST_URL";
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Values taken from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub owner: Option<String>,
    pub projects_url: Option<String>,
    pub github_token: Option<String>,
}

impl EnvOverrides {
    /// Read overrides from the environment, ignoring empty values.
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            owner: read(OWNER_ENV),
            projects_url: read(PROJECTS_LIST_URL_ENV),
            github_token: read(GITHUB_TOKEN_ENV),
        }
    }

    /// Apply the overrides on top of a loaded config.
    pub fn apply(&self, mut config: DevkitConfig) -> DevkitConfig {
        if let Some(ref owner) = self.owner {
            config.owner = Some(owner.clone());
        }
        if let Some(ref url) = self.projects_url {
            config.projects_url = Some(url.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config = DevkitConfig::from_toml_str("").unwrap();
        assert_eq!(config, DevkitConfig::default());
        assert_eq!(config.host, "https://github.com/");
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn parse_full_config() {
        let config = DevkitConfig::from_toml_str(
            r#"
            owner = "jaraco"
            projects_url = "https://example.com/projects.txt"
            host = "https://gitlab.com/"
            git_config = "/tmp/gitconfig"
            "#,
        )
        .unwrap();

        assert_eq!(config.owner.as_deref(), Some("jaraco"));
        assert_eq!(
            config.projects_url.as_deref(),
            Some("https://example.com/projects.txt")
        );
        assert_eq!(config.host, "https://gitlab.com/");
        assert_eq!(config.git_config.as_deref(), Some("/tmp/gitconfig"));
    }

    #[test]
    fn parse_invalid_config_errors() {
        assert!(DevkitConfig::from_toml_str("owner = [").is_err());
    }

    #[test]
    fn env_overrides_win() {
        let config = DevkitConfig {
            owner: Some("file-owner".to_string()),
            ..DevkitConfig::default()
        };
        let env = EnvOverrides {
            owner: Some("env-owner".to_string()),
            projects_url: Some("file:///tmp/projects.txt".to_string()),
            github_token: None,
        };

        let merged = env.apply(config);
        assert_eq!(merged.owner.as_deref(), Some("env-owner"));
        assert_eq!(
            merged.projects_url.as_deref(),
            Some("file:///tmp/projects.txt")
        );
    }

    #[test]
    fn empty_overrides_keep_config() {
        let config = DevkitConfig {
            owner: Some("file-owner".to_string()),
            ..DevkitConfig::default()
        };
        let merged = EnvOverrides::default().apply(config.clone());
        assert_eq!(merged, config);
    }

    #[test]
    fn store_round_trip() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = ConfigStore::from_dir(temp.path());

        assert_eq!(store.load().unwrap(), DevkitConfig::default());

        let config = DevkitConfig {
            owner: Some("jaraco".to_string()),
            ..DevkitConfig::default()
        };
        store.save(&config).unwrap();

        assert!(store.config_path().ends_with(CONFIG_FILE_NAME));
        assert_eq!(store.load().unwrap(), config);
    }
}
