//! Repository locators.

use std::fmt;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use url::Url;

use super::scheme::SchemeRegistry;

/// Address of a project's remote repository, in short or full form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expand a short scheme into its full URL form.
    pub fn resolved(&self, schemes: &SchemeRegistry) -> anyhow::Result<Locator> {
        Ok(Self(schemes.lookup(&self.0)?.resolve(&self.0)))
    }

    /// Contract a full URL into its short scheme form.
    pub fn applied(&self, schemes: &SchemeRegistry) -> anyhow::Result<Locator> {
        Ok(Self(schemes.lookup(&self.0)?.apply(&self.0)))
    }

    /// The resolved form as a parsed URL.
    pub fn to_url(&self, schemes: &SchemeRegistry) -> anyhow::Result<Url> {
        let resolved = self.resolved(schemes)?;
        Url::parse(resolved.as_str())
            .with_context(|| format!("Invalid repository URL: {}", resolved))
    }

    /// Join a relative reference onto the resolved URL and contract the result.
    pub fn join(&self, relative: &str, schemes: &SchemeRegistry) -> anyhow::Result<Locator> {
        let base = self.to_url(schemes)?;
        let joined = base
            .join(relative)
            .with_context(|| format!("Failed to join '{}' onto {}", relative, base))?;
        Self::from(joined).applied(schemes)
    }

    /// Path component of the resolved URL.
    pub fn path(&self, schemes: &SchemeRegistry) -> anyhow::Result<String> {
        Ok(self.to_url(schemes)?.path().to_string())
    }

    /// Last non-empty path segment of the locator, minus any `.git` suffix.
    pub fn basename(&self) -> &str {
        let trimmed = self.0.trim_end_matches('/');
        let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
        last.strip_suffix(".git").unwrap_or(last)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Locator {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<Url> for Locator {
    fn from(value: Url) -> Self {
        Self(value.into())
    }
}
