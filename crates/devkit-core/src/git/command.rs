//! Subprocess helpers for `git` and `gh`.

use std::path::Path;
use std::process::{Command, Output};

use anyhow::Context;

/// Variables that would redirect a child git process at another repository.
const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

/// Build a command for `program` with repository overrides cleared.
pub fn tool_command(program: &str) -> Command {
    let mut cmd = Command::new(program);
    for key in GIT_ENV_OVERRIDES {
        cmd.env_remove(key);
    }
    cmd
}

/// Build a sanitized `git` command.
pub fn git_command() -> Command {
    tool_command("git")
}

/// Run a tool and capture its output, failing on a non-zero exit.
pub fn run_tool(program: &str, cwd: Option<&Path>, args: &[&str]) -> anyhow::Result<Output> {
    let mut cmd = tool_command(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    tracing::debug!(program, ?args, cwd = ?cwd, "Running command");
    let output = cmd
        .output()
        .with_context(|| format!("Failed to run {} {:?}", program, args))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("Command failed {} {:?}: {}", program, args, stderr.trim());
    }
    Ok(output)
}

/// Run a git command, failing on a non-zero exit.
pub fn run_git(cwd: Option<&Path>, args: &[&str]) -> anyhow::Result<()> {
    run_tool("git", cwd, args).map(|_| ())
}

/// Run a git command and return its trimmed stdout.
pub fn git_output(cwd: Option<&Path>, args: &[&str]) -> anyhow::Result<String> {
    let output = run_tool("git", cwd, args)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a git command with inherited stdio, failing on a non-zero exit.
pub fn run_git_interactive(cwd: Option<&Path>, args: &[&str]) -> anyhow::Result<()> {
    let mut cmd = git_command();
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    tracing::debug!(?args, cwd = ?cwd, "Running interactive git");
    let status = cmd
        .status()
        .with_context(|| format!("Failed to run git {:?}", args))?;
    if !status.success() {
        anyhow::bail!("Git command failed {:?}: exit status {}", args, status);
    }
    Ok(())
}
