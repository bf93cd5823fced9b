//! Application context for unified dependency injection.

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Context;
use url::Url;

use crate::config::{
    ConfigStore, DevkitConfig, EnvOverrides, OWNER_ENV, PROJECTS_LIST_URL_ENV,
};
use crate::github::GitHubClient;
use crate::locator::{GitConfigSource, NameResolver, SchemeRegistry};
use crate::project::ProjectList;

/// Unified application context.
///
/// Holds the effective configuration (file plus environment) and builds
/// the services commands need. The CLI creates this once per invocation.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: DevkitConfig,
    env: EnvOverrides,
    config_path: Option<PathBuf>,
}

impl AppContext {
    /// Load from the default config file and the process environment.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let store = ConfigStore::from_default_dir()?;
        Self::from_store(&store, EnvOverrides::from_env())
    }

    /// Load from an explicit config store.
    pub fn from_store(store: &ConfigStore, env: EnvOverrides) -> anyhow::Result<Self> {
        let config = store.load()?;
        let mut ctx = Self::new(config, env);
        ctx.config_path = Some(store.config_path().to_path_buf());
        Ok(ctx)
    }

    /// Create a context with explicit values.
    pub fn new(config: DevkitConfig, env: EnvOverrides) -> Self {
        Self {
            config: env.apply(config),
            env,
            config_path: None,
        }
    }

    /// Effective configuration, with environment overrides applied.
    pub fn config(&self) -> &DevkitConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Scheme rules from git configuration.
    pub fn scheme_registry(&self) -> SchemeRegistry {
        match self.config.git_config {
            Some(ref file) => SchemeRegistry::new(GitConfigSource::from_file(file)),
            None => SchemeRegistry::from_git_config(),
        }
    }

    /// API client authenticated with the environment token.
    pub fn github_client(&self) -> anyhow::Result<GitHubClient> {
        GitHubClient::with_token(&self.config.api_url, self.env.github_token.as_deref())
    }

    /// Default owner: configured value, else the authenticated user's login.
    pub fn owner(&self) -> anyhow::Result<String> {
        if let Some(ref owner) = self.config.owner {
            return Ok(owner.clone());
        }
        let client = self.github_client().with_context(|| {
            format!(
                "No default owner configured; set {} or `owner` in devkit.toml",
                OWNER_ENV
            )
        })?;
        let login = block_on(client.username())??;
        tracing::debug!(owner = %login, "Using authenticated user as default owner");
        Ok(login)
    }

    /// Resolver for project names.
    pub fn name_resolver(&self) -> anyhow::Result<NameResolver> {
        Ok(NameResolver::new(
            self.config.host.as_str(),
            self.owner()?,
            self.scheme_registry(),
        ))
    }

    /// Location of the project list.
    pub fn projects_url(&self) -> anyhow::Result<Url> {
        let raw = self.config.projects_url.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "No project list configured; set {} or `projects_url` in devkit.toml",
                PROJECTS_LIST_URL_ENV
            )
        })?;
        Url::parse(raw).with_context(|| format!("Invalid project list URL: {}", raw))
    }

    /// Load the project list.
    pub fn projects(&self) -> anyhow::Result<ProjectList> {
        let url = self.projects_url()?;
        block_on(ProjectList::fetch(&url))?
    }
}

/// Drive a future to completion on a fresh runtime.
pub fn block_on<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;
    Ok(runtime.block_on(future))
}
