//! Add a project to the shared project list.
//!
//! The list lives in a repository of its own. The command edits it in a
//! temporary checkout, pushes the change, then clones the new project.

use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use url::Url;

use crate::git::{Checkout, CloneOptions, run_git};
use crate::locator::NameResolver;
use crate::project::{ProjectList, ProjectSpec};

/// Path segment separating the repository from the file in a raw list URL.
const BRANCH_MARKER: &str = "/main/";

/// Repository holding the project list, and the list's path within it.
#[derive(Debug, Clone)]
pub struct ProjectsRepo {
    pub project: ProjectSpec,
    pub path: PathBuf,
}

impl ProjectsRepo {
    pub fn new(project: ProjectSpec, path: impl Into<PathBuf>) -> Self {
        Self {
            project,
            path: path.into(),
        }
    }

    /// Derive the repository from a raw file URL such as
    /// `https://raw.githubusercontent.com/<owner>/<repo>/main/projects.txt`.
    pub fn from_list_url(url: &Url) -> anyhow::Result<Self> {
        let (repo, path) = url.path().split_once(BRANCH_MARKER).ok_or_else(|| {
            anyhow::anyhow!(
                "Project list URL has no '{}' segment: {}",
                BRANCH_MARKER.trim_matches('/'),
                url
            )
        })?;
        if repo.trim_matches('/').is_empty() || path.is_empty() {
            anyhow::bail!("Cannot locate project list repository in {}", url);
        }
        Ok(Self::new(ProjectSpec::new(repo), path))
    }
}

/// Options for the add command
#[derive(Debug, Clone)]
pub struct AddOptions {
    /// Directory that receives the new project's checkout
    pub root: PathBuf,
}

impl AddOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Report from adding a project
#[derive(Debug, Clone, Serialize)]
pub struct AddReport {
    pub project: String,
    /// Whether the list changed and was pushed
    pub listed: bool,
    /// Path of the new checkout, if one was made
    pub checkout: Option<PathBuf>,
}

#[derive(Debug)]
pub struct AddCommand<'a> {
    checkout: Checkout<'a>,
}

impl<'a> AddCommand<'a> {
    pub fn new(resolver: &'a NameResolver) -> Self {
        Self {
            checkout: Checkout::new(resolver),
        }
    }

    pub fn execute(
        &self,
        project: &ProjectSpec,
        list_repo: &ProjectsRepo,
        options: &AddOptions,
    ) -> anyhow::Result<AddReport> {
        let listed = self.update_list(project, list_repo)?;
        let checkout = self
            .checkout
            .checkout_missing(project, &options.root, &CloneOptions::new())?;
        Ok(AddReport {
            project: project.name().to_string(),
            listed,
            checkout,
        })
    }

    fn update_list(
        &self,
        project: &ProjectSpec,
        list_repo: &ProjectsRepo,
    ) -> anyhow::Result<bool> {
        let temp = self
            .checkout
            .temp_checkout(&list_repo.project, &CloneOptions::new().with_quiet(true))?;
        let file = temp.path().join(&list_repo.path);

        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read project list: {}", file.display()))?;
        let mut list = ProjectList::parse(&text)
            .with_context(|| format!("Failed to parse project list: {}", file.display()))?;
        if !list.insert(project.clone()) {
            tracing::info!(project = %project, "Project already listed");
        }
        list.sort();

        let rendered = list.render();
        if rendered == text {
            return Ok(false);
        }

        std::fs::write(&file, &rendered)
            .with_context(|| format!("Failed to write project list: {}", file.display()))?;
        let message = format!("Adding {}", project.name());
        run_git(Some(temp.path()), &["commit", "-a", "-m", &message])?;
        run_git(Some(temp.path()), &["push"])
            .with_context(|| format!("Failed to push project list for {}", project))?;
        tracing::info!(project = %project, "Added project to list");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_repo_from_raw_url() {
        let url =
            Url::parse("https://raw.githubusercontent.com/jaraco/dotfiles/main/projects.txt")
                .unwrap();
        let repo = ProjectsRepo::from_list_url(&url).unwrap();

        assert_eq!(repo.project.name(), "/jaraco/dotfiles");
        assert_eq!(repo.path, PathBuf::from("projects.txt"));
    }

    #[test]
    fn list_repo_keeps_nested_path() {
        let url = Url::parse("https://example.com/acme/meta/main/lists/projects.txt").unwrap();
        let repo = ProjectsRepo::from_list_url(&url).unwrap();

        assert_eq!(repo.project.name(), "/acme/meta");
        assert_eq!(repo.path, PathBuf::from("lists/projects.txt"));
    }

    #[test]
    fn list_repo_requires_branch_segment() {
        let url = Url::parse("https://example.com/projects.txt").unwrap();
        assert!(ProjectsRepo::from_list_url(&url).is_err());
    }
}
