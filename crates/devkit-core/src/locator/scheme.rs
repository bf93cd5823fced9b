//! URL scheme substitution rules.
//!
//! Rules come from git's `url.<base>.insteadOf` configuration, so a
//! short form like `gh://org/repo` expands to `https://github.com/org/repo`
//! and back.

use std::cell::OnceCell;
use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

use crate::git::git_command;

/// One configured URL substitution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SchemeRule {
    /// Short form (e.g. "gh://")
    pub prefix: String,
    /// Full form it stands for (e.g. "https://github.com/")
    pub value: String,
}

impl SchemeRule {
    pub fn new(prefix: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            value: value.into(),
        }
    }

    /// Parse one line of `git config --get-regexp` output:
    /// `url.<value>.insteadof <prefix>`.
    pub fn parse_config_line(line: &str) -> anyhow::Result<Self> {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(prefix), None) = (parts.next(), parts.next(), parts.next()) else {
            anyhow::bail!("Unexpected insteadOf config line: '{}'", line);
        };
        let value = key
            .strip_prefix("url.")
            .and_then(|rest| rest.strip_suffix(".insteadof"))
            .ok_or_else(|| anyhow::anyhow!("Unexpected insteadOf config key: '{}'", key))?;
        Ok(Self::new(prefix, value))
    }

    /// Whether `url` is written in either form of this rule.
    pub fn matches(&self, url: &str) -> bool {
        url.starts_with(&self.prefix) || url.starts_with(&self.value)
    }

    /// Expand a leading short form into the full form.
    pub fn resolve(&self, url: &str) -> String {
        match url.strip_prefix(&self.prefix) {
            Some(rest) => format!("{}{}", self.value, rest),
            None => url.to_string(),
        }
    }

    /// Contract a leading full form into the short form.
    pub fn apply(&self, url: &str) -> String {
        match url.strip_prefix(&self.value) {
            Some(rest) => format!("{}{}", self.prefix, rest),
            None => url.to_string(),
        }
    }
}

impl fmt::Display for SchemeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.prefix, self.value)
    }
}

/// Outcome of a rule lookup.
///
/// The null scheme leaves URLs untouched in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme<'a> {
    Known(&'a SchemeRule),
    Null,
}

impl<'a> Scheme<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn rule(&self) -> Option<&'a SchemeRule> {
        match self {
            Self::Known(rule) => Some(rule),
            Self::Null => None,
        }
    }

    pub fn resolve(&self, url: &str) -> String {
        match self {
            Self::Known(rule) => rule.resolve(url),
            Self::Null => url.to_string(),
        }
    }

    pub fn apply(&self, url: &str) -> String {
        match self {
            Self::Known(rule) => rule.apply(url),
            Self::Null => url.to_string(),
        }
    }
}

/// Where scheme rules come from.
pub trait SchemeSource: fmt::Debug {
    /// Load all rules, in the order they should be tried.
    fn load(&self) -> anyhow::Result<Vec<SchemeRule>>;
}

/// Rules read from git configuration.
#[derive(Debug, Clone, Default)]
pub struct GitConfigSource {
    /// Read this file instead of the user's merged configuration.
    file: Option<PathBuf>,
}

impl GitConfigSource {
    /// Use the merged system/global/local configuration.
    pub fn new() -> Self {
        Self { file: None }
    }

    /// Use a single config file.
    pub fn from_file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file.into()),
        }
    }
}

impl SchemeSource for GitConfigSource {
    fn load(&self) -> anyhow::Result<Vec<SchemeRule>> {
        let mut cmd = git_command();
        cmd.arg("config");
        if let Some(file) = &self.file {
            cmd.arg("--file").arg(file);
        }
        cmd.args(["--get-regexp", r"url\..*\.insteadof"]);

        let output = cmd
            .output()
            .context("Failed to invoke git config --get-regexp")?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            // Exit status 1 means no matching keys.
            if output.status.code() == Some(1) && stdout.trim().is_empty() {
                return Ok(Vec::new());
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git config --get-regexp failed: {}", stderr.trim());
        }

        stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(SchemeRule::parse_config_line)
            .collect()
    }
}

/// A fixed set of rules.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    rules: Vec<SchemeRule>,
}

impl StaticSource {
    pub fn new(rules: Vec<SchemeRule>) -> Self {
        Self { rules }
    }
}

impl SchemeSource for StaticSource {
    fn load(&self) -> anyhow::Result<Vec<SchemeRule>> {
        Ok(self.rules.clone())
    }
}

/// Lazily loaded, ordered scheme rules.
///
/// Rules are loaded on first use and kept until [`SchemeRegistry::reload`].
/// Lookups return the first matching rule in load order.
#[derive(Debug)]
pub struct SchemeRegistry {
    source: Box<dyn SchemeSource>,
    rules: OnceCell<Vec<SchemeRule>>,
}

impl SchemeRegistry {
    pub fn new(source: impl SchemeSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            rules: OnceCell::new(),
        }
    }

    /// Registry backed by the user's git configuration.
    pub fn from_git_config() -> Self {
        Self::new(GitConfigSource::new())
    }

    /// Registry with a fixed set of rules.
    pub fn with_rules(rules: Vec<SchemeRule>) -> Self {
        Self::new(StaticSource::new(rules))
    }

    /// All rules, loading them on first call.
    pub fn rules(&self) -> anyhow::Result<&[SchemeRule]> {
        if let Some(rules) = self.rules.get() {
            return Ok(rules);
        }
        let loaded = self.source.load()?;
        tracing::debug!(count = loaded.len(), "Loaded URL scheme rules");
        Ok(self.rules.get_or_init(|| loaded))
    }

    /// Discard cached rules and load them again.
    pub fn reload(&mut self) -> anyhow::Result<&[SchemeRule]> {
        self.rules = OnceCell::new();
        self.rules()
    }

    /// Find the first rule written in either form of `url`.
    pub fn lookup(&self, url: &str) -> anyhow::Result<Scheme<'_>> {
        let scheme = self
            .rules()?
            .iter()
            .find(|rule| rule.matches(url))
            .map_or(Scheme::Null, Scheme::Known);
        Ok(scheme)
    }
}
