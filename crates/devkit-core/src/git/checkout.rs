//! Cloning projects into working directories.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::TempDir;

use crate::locator::NameResolver;
use crate::project::ProjectSpec;

use super::command::{git_output, run_git, run_tool};

/// Clone depth used for throwaway checkouts.
pub const TEMP_CHECKOUT_DEPTH: u32 = 50;

/// Options passed through to `git clone`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneOptions {
    /// Truncate history to this many commits
    pub depth: Option<u32>,
    /// Suppress progress output
    pub quiet: bool,
    /// Check out this branch instead of the remote HEAD
    pub branch: Option<String>,
}

impl CloneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Render as `git clone` arguments, in a fixed order.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(depth) = self.depth {
            args.push("--depth".to_string());
            args.push(depth.to_string());
        }
        if self.quiet {
            args.push("--quiet".to_string());
        }
        if let Some(ref branch) = self.branch {
            args.push("--branch".to_string());
            args.push(branch.clone());
        }
        args
    }
}

/// A clone living in a temporary directory, removed on drop.
#[derive(Debug)]
pub struct TempCheckout {
    _dir: TempDir,
    repo: PathBuf,
}

impl TempCheckout {
    /// Path to the cloned repository.
    pub fn path(&self) -> &Path {
        &self.repo
    }
}

/// Clones projects resolved through a [`NameResolver`].
#[derive(Debug, Clone, Copy)]
pub struct Checkout<'a> {
    resolver: &'a NameResolver,
}

impl<'a> Checkout<'a> {
    pub fn new(resolver: &'a NameResolver) -> Self {
        Self { resolver }
    }

    /// Clone a project into `target`, returning the repository path.
    ///
    /// Projects tagged `fork` are also wired up to their upstream.
    pub fn clone_into(
        &self,
        project: &ProjectSpec,
        target: &Path,
        options: &CloneOptions,
    ) -> anyhow::Result<PathBuf> {
        let url = self.resolver.resolve_full(project.name())?;
        let target_str = target
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid target directory: {}", target.display()))?;

        let extra = options.to_args();
        let mut args = vec!["-C", target_str, "clone", url.as_str()];
        args.extend(extra.iter().map(String::as_str));

        tracing::info!(project = %project, %url, target = %target.display(), "Cloning project");
        run_git(None, &args).with_context(|| format!("Failed to clone {}", project))?;

        let repo = target.join(url.basename());
        if project.has_tag("fork") {
            configure_fork(project, &repo)?;
        }
        Ok(repo)
    }

    /// Directory under `root` named for the project's owner.
    pub fn target_for_root(&self, project: &ProjectSpec, root: &Path) -> anyhow::Result<PathBuf> {
        let path = self
            .resolver
            .resolve(project.name())?
            .path(self.resolver.schemes())?;
        let owner = path
            .split('/')
            .find(|segment| !segment.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Repository path has no owner: {}", path))?;
        Ok(root.join(owner))
    }

    /// Whether the project is already cloned inside `target`.
    pub fn exists(&self, project: &ProjectSpec, target: &Path) -> anyhow::Result<bool> {
        let locator = self.resolver.resolve(project.name())?;
        Ok(target.join(locator.basename()).is_dir())
    }

    /// Clone the project under its owner directory unless already present.
    ///
    /// Returns the new repository path, or `None` when nothing was cloned.
    pub fn checkout_missing(
        &self,
        project: &ProjectSpec,
        root: &Path,
        options: &CloneOptions,
    ) -> anyhow::Result<Option<PathBuf>> {
        let target = self.target_for_root(project, root)?;
        if self.exists(project, &target)? {
            tracing::debug!(project = %project, target = %target.display(), "Already checked out");
            return Ok(None);
        }
        std::fs::create_dir_all(&target)
            .with_context(|| format!("Failed to create directory: {}", target.display()))?;
        self.clone_into(project, &target, options).map(Some)
    }

    /// Clone the project into a fresh temporary directory.
    ///
    /// Depth defaults to [`TEMP_CHECKOUT_DEPTH`] when not set.
    pub fn temp_checkout(
        &self,
        project: &ProjectSpec,
        options: &CloneOptions,
    ) -> anyhow::Result<TempCheckout> {
        let dir = TempDir::new().context("Failed to create temporary checkout directory")?;
        let mut options = options.clone();
        if options.depth.is_none() {
            options.depth = Some(TEMP_CHECKOUT_DEPTH);
        }
        let repo = self.clone_into(project, dir.path(), &options)?;
        Ok(TempCheckout { _dir: dir, repo })
    }
}

/// Fork the upstream repository and point the local clone at both remotes.
fn configure_fork(project: &ProjectSpec, repo: &Path) -> anyhow::Result<()> {
    tracing::info!(project = %project, "Configuring fork");
    run_tool("gh", Some(repo), &["repo", "fork", "--remote"])?;
    run_git(
        Some(repo),
        &["config", "--local", "branch.main.remote", "upstream"],
    )?;
    let origin = git_output(Some(repo), &["remote", "get-url", "origin"])?;
    run_git(
        Some(repo),
        &["remote", "set-url", "--push", "upstream", &origin],
    )?;
    run_tool(
        "gh",
        Some(repo),
        &["repo", "set-default", project.name().trim_start_matches('/')],
    )?;
    Ok(())
}
