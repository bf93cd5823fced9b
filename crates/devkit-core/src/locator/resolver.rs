//! Project name resolution.

use super::address::Locator;
use super::scheme::SchemeRegistry;

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "https://github.com/";

/// Maps short project names to repository locators.
///
/// Unqualified names (`keyring`) belong to the default owner; names with
/// a `/` (`pypa/setuptools`, `/pypa/setuptools`) are already qualified
/// relative to the host.
#[derive(Debug)]
pub struct NameResolver {
    host: Locator,
    owner: String,
    schemes: SchemeRegistry,
}

impl NameResolver {
    pub fn new(
        host: impl Into<Locator>,
        owner: impl Into<String>,
        schemes: SchemeRegistry,
    ) -> Self {
        let host = host.into();
        let host = if host.as_str().ends_with('/') {
            host
        } else {
            Locator::new(format!("{}/", host))
        };
        Self {
            host,
            owner: owner.into(),
            schemes,
        }
    }

    pub fn host(&self) -> &Locator {
        &self.host
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn schemes(&self) -> &SchemeRegistry {
        &self.schemes
    }

    /// Resolve a project name into a locator in short scheme form.
    pub fn resolve(&self, name: &str) -> anyhow::Result<Locator> {
        let relative = if name.contains('/') {
            name.trim_start_matches('/').to_string()
        } else {
            format!("{}/{}", self.owner, name)
        };
        let locator = self.host.join(&relative, &self.schemes)?;
        tracing::debug!(name, %locator, "Resolved project name");
        Ok(locator)
    }

    /// Resolve a project name into its full URL form.
    pub fn resolve_full(&self, name: &str) -> anyhow::Result<Locator> {
        self.resolve(name)?.resolved(&self.schemes)
    }

    /// `owner/repo` path of a project on the host.
    pub fn repo_path(&self, name: &str) -> anyhow::Result<String> {
        let path = self.resolve(name)?.path(&self.schemes)?;
        Ok(path.trim_matches('/').to_string())
    }
}
