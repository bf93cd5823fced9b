//! Merge an upstream base repository into each selected project.
//!
//! Conflicts are handed to the `known-merge` mergetool when it is configured
//! in git, falling back to the default mergetool.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::git::{Checkout, CloneOptions, git_command, git_output, run_git, run_git_interactive};
use crate::locator::{Locator, NameResolver};
use crate::project::ProjectSpec;

/// Base repository merged by default.
pub const DEFAULT_BASE: &str = "gh://jaraco/skeleton";

/// Projects carrying any of these tags are never updated.
pub const SKIP_TAGS: [&str; 2] = ["fork", "base"];

/// Merge tool tried before the user's default.
pub const KNOWN_MERGE_TOOL: &str = "known-merge";

/// Files renamed in the base that projects may still carry under the old name.
const RENAMES: [(&str, &str); 1] = [("CHANGES.rst", "NEWS.rst")];

/// Options for the update command
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Repository to pull from (scheme shorthands allowed)
    pub base: String,
    /// Branch of the base to pull; the remote HEAD when unset
    pub branch: Option<String>,
    /// Merge but do not push
    pub dry_run: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.to_string(),
            branch: None,
            dry_run: false,
        }
    }
}

impl UpdateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// What happened to one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Tagged `fork` or `base`
    Skipped,
    /// The base shares no history with the project
    Unrelated,
    /// Pulled cleanly
    Merged,
    /// Pulled with conflicts that were resolved and committed
    Resolved,
}

impl UpdateOutcome {
    /// Whether the project received the base's changes.
    pub fn is_updated(self) -> bool {
        matches!(self, Self::Merged | Self::Resolved)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectUpdate {
    pub project: String,
    pub outcome: UpdateOutcome,
}

/// Report from an update run
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReport {
    pub projects: Vec<ProjectUpdate>,
    pub dry_run: bool,
}

impl UpdateReport {
    /// Number of projects that took the base's changes.
    pub fn updated(&self) -> usize {
        self.projects
            .iter()
            .filter(|update| update.outcome.is_updated())
            .count()
    }
}

/// Whether a project is excluded from updates by its tags.
pub fn should_skip(project: &ProjectSpec) -> bool {
    SKIP_TAGS.iter().any(|tag| project.has_tag(tag))
}

/// Whether a failed pull was refused for lack of shared history.
pub fn is_unrelated_histories(stderr: &str) -> bool {
    stderr.contains("unrelated histories")
}

/// Whether `git status --porcelain` shows `path` deleted on our side and
/// modified on theirs.
pub fn has_rename_conflict(status: &str, path: &str) -> bool {
    status
        .lines()
        .any(|line| line.strip_prefix("UD ").is_some_and(|rest| rest == path))
}

#[derive(Debug)]
pub struct UpdateCommand<'a> {
    checkout: Checkout<'a>,
    resolver: &'a NameResolver,
}

impl<'a> UpdateCommand<'a> {
    pub fn new(resolver: &'a NameResolver) -> Self {
        Self {
            checkout: Checkout::new(resolver),
            resolver,
        }
    }

    pub fn execute<'p>(
        &self,
        projects: impl IntoIterator<Item = &'p ProjectSpec>,
        options: &UpdateOptions,
    ) -> anyhow::Result<UpdateReport> {
        let base = Locator::new(options.base.as_str()).resolved(self.resolver.schemes())?;
        let mut report = UpdateReport {
            dry_run: options.dry_run,
            ..UpdateReport::default()
        };
        for project in projects {
            let outcome = self.update_project(project, base.as_str(), options)?;
            report.projects.push(ProjectUpdate {
                project: project.name().to_string(),
                outcome,
            });
        }
        tracing::info!(updated = report.updated(), "Update finished");
        Ok(report)
    }

    fn update_project(
        &self,
        project: &ProjectSpec,
        base: &str,
        options: &UpdateOptions,
    ) -> anyhow::Result<UpdateOutcome> {
        if should_skip(project) {
            tracing::debug!(project = %project, "Skipping by tag");
            return Ok(UpdateOutcome::Skipped);
        }
        tracing::info!(project = %project, base, "Updating project");

        let checkout = self
            .checkout
            .temp_checkout(project, &CloneOptions::new().with_quiet(true))?;
        let repo = checkout.path();

        let mut args = vec!["pull", base];
        if let Some(ref branch) = options.branch {
            args.push(branch.as_str());
        }
        args.push("--no-edit");

        let output = git_command()
            .args(&args)
            .current_dir(repo)
            .output()
            .with_context(|| format!("Failed to run git pull in {}", project))?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(
            stdout = %String::from_utf8_lossy(&output.stdout).trim(),
            stderr = %stderr.trim(),
            "git pull"
        );

        let outcome = if output.status.success() {
            UpdateOutcome::Merged
        } else if is_unrelated_histories(&stderr) {
            tracing::warn!(project = %project, "Base shares no history, skipping");
            return Ok(UpdateOutcome::Unrelated);
        } else {
            resolve_conflicts(repo)
                .with_context(|| format!("Failed to resolve merge in {}", project))?;
            UpdateOutcome::Resolved
        };

        if options.dry_run {
            tracing::info!(project = %project, "Dry run, not pushing");
        } else {
            run_git(Some(repo), &["push"])
                .with_context(|| format!("Failed to push {}", project))?;
        }
        Ok(outcome)
    }
}

fn resolve_conflicts(repo: &Path) -> anyhow::Result<()> {
    for (old, new) in RENAMES {
        handle_rename(repo, old, new)?;
    }
    if let Err(err) = run_git_interactive(Some(repo), &["mergetool", "-t", KNOWN_MERGE_TOOL]) {
        tracing::warn!(error = %err, "Known merge failed, falling back to default mergetool");
        run_git_interactive(Some(repo), &["mergetool"])?;
    }
    run_git_interactive(Some(repo), &["commit", "--no-edit"])
}

/// Carry the project's edits to a file the base renamed.
fn handle_rename(repo: &Path, old: &str, new: &str) -> anyhow::Result<()> {
    let status = git_output(Some(repo), &["status", "--porcelain"])?;
    if !has_rename_conflict(&status, old) {
        return Ok(());
    }
    tracing::info!(from = old, to = new, "Moving renamed file");
    std::fs::copy(repo.join(old), repo.join(new))
        .with_context(|| format!("Failed to copy {} to {}", old, new))?;
    run_git(Some(repo), &["rm", old])?;
    run_git(Some(repo), &["add", new])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_fork_and_base() {
        assert!(should_skip(&ProjectSpec::new("/python/cpython").with_tags(["fork"])));
        assert!(should_skip(&ProjectSpec::new("skeleton").with_tags(["base"])));
        assert!(!should_skip(&ProjectSpec::new("keyring").with_tags(["lifted"])));
        assert!(!should_skip(&ProjectSpec::new("jaraco.develop")));
    }

    #[test]
    fn detects_unrelated_histories() {
        assert!(is_unrelated_histories(
            "fatal: refusing to merge unrelated histories\n"
        ));
        assert!(!is_unrelated_histories("CONFLICT (content): Merge conflict in setup.cfg"));
    }

    #[test]
    fn detects_rename_conflict_line() {
        let status = "UU pyproject.toml\nUD CHANGES.rst\n?? notes.txt";
        assert!(has_rename_conflict(status, "CHANGES.rst"));
        assert!(!has_rename_conflict(status, "NEWS.rst"));
        assert!(!has_rename_conflict("UU CHANGES.rst", "CHANGES.rst"));
    }

    #[test]
    fn options_builders() {
        let options = UpdateOptions::new()
            .with_base("gh://acme/template")
            .with_branch("main")
            .with_dry_run(true);
        assert_eq!(options.base, "gh://acme/template");
        assert_eq!(options.branch.as_deref(), Some("main"));
        assert!(options.dry_run);
        assert_eq!(UpdateOptions::default().base, DEFAULT_BASE);
    }

    #[test]
    fn report_counts_updated_projects() {
        let report = UpdateReport {
            projects: vec![
                ProjectUpdate {
                    project: "a".to_string(),
                    outcome: UpdateOutcome::Merged,
                },
                ProjectUpdate {
                    project: "b".to_string(),
                    outcome: UpdateOutcome::Skipped,
                },
                ProjectUpdate {
                    project: "c".to_string(),
                    outcome: UpdateOutcome::Resolved,
                },
                ProjectUpdate {
                    project: "d".to_string(),
                    outcome: UpdateOutcome::Unrelated,
                },
            ],
            dry_run: true,
        };
        assert_eq!(report.updated(), 2);
    }
}
