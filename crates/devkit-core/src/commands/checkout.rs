//! Checkout command implementation.
//!
//! Clones every selected project under a root directory, grouped by owner,
//! skipping projects that are already present.

use std::path::PathBuf;

use serde::Serialize;

use crate::git::{Checkout, CloneOptions};
use crate::locator::NameResolver;
use crate::project::ProjectSpec;

/// Options for the checkout command
#[derive(Debug, Clone)]
pub struct CheckoutOptions {
    /// Directory that receives `<owner>/<repo>` checkouts
    pub root: PathBuf,
    /// Options passed to `git clone`
    pub clone: CloneOptions,
}

impl CheckoutOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            clone: CloneOptions::new(),
        }
    }

    pub fn with_clone_options(mut self, clone: CloneOptions) -> Self {
        self.clone = clone;
        self
    }
}

/// Report from a checkout run
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckoutReport {
    /// Paths of newly cloned repositories
    pub cloned: Vec<PathBuf>,
    /// Projects that were already checked out
    pub present: Vec<String>,
}

/// Clones missing projects.
#[derive(Debug)]
pub struct CheckoutCommand<'a> {
    checkout: Checkout<'a>,
}

impl<'a> CheckoutCommand<'a> {
    pub fn new(resolver: &'a NameResolver) -> Self {
        Self {
            checkout: Checkout::new(resolver),
        }
    }

    pub fn execute<'p>(
        &self,
        projects: impl IntoIterator<Item = &'p ProjectSpec>,
        options: &CheckoutOptions,
    ) -> anyhow::Result<CheckoutReport> {
        let mut report = CheckoutReport::default();
        for project in projects {
            match self
                .checkout
                .checkout_missing(project, &options.root, &options.clone)?
            {
                Some(repo) => report.cloned.push(repo),
                None => report.present.push(project.name().to_string()),
            }
        }
        Ok(report)
    }
}
