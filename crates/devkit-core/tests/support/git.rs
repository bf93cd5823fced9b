use std::path::Path;
use std::process::Command;

const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

pub fn git_command() -> Command {
    let mut cmd = Command::new("git");
    for key in GIT_ENV_OVERRIDES {
        cmd.env_remove(key);
    }
    cmd
}

/// Append an `insteadOf` rule to a standalone git config file.
pub fn add_instead_of(config: &Path, value: &str, prefix: &str) {
    let status = git_command()
        .arg("config")
        .arg("--file")
        .arg(config)
        .arg("--add")
        .arg(format!("url.{value}.insteadOf"))
        .arg(prefix)
        .status()
        .unwrap();
    assert!(status.success(), "git config failed for {prefix}");
}
