//! Project list loading.

use std::collections::HashSet;

use anyhow::Context;
use url::Url;

use crate::filter::SelectorGroup;

use super::spec::{ParseError, ProjectSpec};

/// An ordered collection of projects, unique by name.
#[derive(Debug, Clone, Default)]
pub struct ProjectList {
    projects: Vec<ProjectSpec>,
}

impl ProjectList {
    /// Build a list, keeping the first of any projects sharing a name.
    pub fn from_projects(projects: impl IntoIterator<Item = ProjectSpec>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for project in projects {
            if seen.contains(project.name()) {
                tracing::warn!(project = %project, "Ignoring duplicate project entry");
                continue;
            }
            seen.insert(project.name().to_string());
            kept.push(project);
        }
        Self { projects: kept }
    }

    /// Parse a project list document.
    ///
    /// Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut projects = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let project = ProjectSpec::parse(trimmed).map_err(|err| err.at_line(idx + 1))?;
            projects.push(project);
        }
        Ok(Self::from_projects(projects))
    }

    /// Load a project list from a `file://` or HTTP(S) URL.
    pub async fn fetch(url: &Url) -> anyhow::Result<Self> {
        let text = if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .map_err(|()| anyhow::anyhow!("Invalid file URL for project list: {}", url))?;
            tracing::debug!(path = %path.display(), "Reading project list");
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read project list: {}", path.display()))?
        } else {
            tracing::debug!(%url, "Downloading project list");
            let response = reqwest::get(url.clone())
                .await
                .with_context(|| format!("Failed to fetch project list from {}", url))?;

            if !response.status().is_success() {
                anyhow::bail!(
                    "Failed to fetch project list: HTTP {} from {}",
                    response.status(),
                    url
                );
            }

            response
                .text()
                .await
                .with_context(|| format!("Failed to read response body from {}", url))?
        };

        Self::parse(&text).with_context(|| format!("Failed to parse project list from {}", url))
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectSpec> {
        self.projects.iter()
    }

    /// Look up a project by name.
    pub fn get(&self, name: &str) -> Option<&ProjectSpec> {
        self.projects.iter().find(|p| p.name() == name)
    }

    /// Add a project unless one with the same name is already listed.
    pub fn insert(&mut self, project: ProjectSpec) -> bool {
        if self.get(project.name()).is_some() {
            return false;
        }
        self.projects.push(project);
        true
    }

    /// Order projects by name, ignoring case.
    pub fn sort(&mut self) {
        self.projects
            .sort_by_cached_key(|project| project.name().to_lowercase());
    }

    /// Render as a project list document, one spec line per project.
    pub fn render(&self) -> String {
        self.projects
            .iter()
            .map(|project| format!("{}\n", project.spec()))
            .collect()
    }

    /// Projects admitted by a selector group, in list order.
    pub fn select<'a>(
        &'a self,
        selectors: &'a SelectorGroup,
    ) -> impl Iterator<Item = &'a ProjectSpec> + 'a {
        selectors.filter(self.projects.iter())
    }
}

impl IntoIterator for ProjectList {
    type Item = ProjectSpec;
    type IntoIter = std::vec::IntoIter<ProjectSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.projects.into_iter()
    }
}

impl<'a> IntoIterator for &'a ProjectList {
    type Item = &'a ProjectSpec;
    type IntoIter = std::slice::Iter<'a, ProjectSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.projects.iter()
    }
}
