//! Git operations for checking out projects.
//!
//! This module provides:
//! - Sanitized `git`/`gh` subprocess helpers
//! - Cloning resolved projects into a root or a temporary directory

mod checkout;
mod command;

pub use checkout::{Checkout, CloneOptions, TEMP_CHECKOUT_DEPTH, TempCheckout};
pub use command::{
    git_command, git_output, run_git, run_git_interactive, run_tool, tool_command,
};

#[cfg(test)]
mod tests;
