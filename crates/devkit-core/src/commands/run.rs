//! Run a command inside a fresh checkout of each selected project.

use anyhow::Context;
use serde::Serialize;

use crate::git::{Checkout, CloneOptions, tool_command};
use crate::locator::NameResolver;
use crate::project::ProjectSpec;

/// Options for the run command
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Program and arguments to run in each checkout
    pub command: Vec<String>,
    /// Options passed to `git clone`
    pub clone: CloneOptions,
}

impl RunOptions {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            clone: CloneOptions::new().with_quiet(true),
        }
    }
}

/// Report from a run across projects
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Projects the command completed successfully in
    pub completed: Vec<String>,
}

#[derive(Debug)]
pub struct RunCommand<'a> {
    checkout: Checkout<'a>,
}

impl<'a> RunCommand<'a> {
    pub fn new(resolver: &'a NameResolver) -> Self {
        Self {
            checkout: Checkout::new(resolver),
        }
    }

    /// Run the command in each project; the first failure stops the run.
    pub fn execute<'p>(
        &self,
        projects: impl IntoIterator<Item = &'p ProjectSpec>,
        options: &RunOptions,
    ) -> anyhow::Result<RunReport> {
        let (program, args) = options
            .command
            .split_first()
            .ok_or_else(|| anyhow::anyhow!("No command given to run"))?;

        let mut report = RunReport::default();
        for project in projects {
            let checkout = self.checkout.temp_checkout(project, &options.clone)?;
            tracing::info!(project = %project, program, "Running command");

            let status = tool_command(program)
                .args(args)
                .current_dir(checkout.path())
                .status()
                .with_context(|| format!("Failed to run {} in {}", program, project))?;
            if !status.success() {
                anyhow::bail!("Command {:?} failed in {}: {}", options.command, project, status);
            }
            report.completed.push(project.name().to_string());
        }
        Ok(report)
    }
}
