//! Devkit Core Library
//!
//! Provides the domain logic for batch chores across a list of projects:
//! parsing project lists, selecting subsets with keyword/tag filters,
//! resolving short project names to repository locators, and driving
//! `git` and the hosted service API.

pub mod commands;
pub mod config;
pub mod context;
pub mod filter;
pub mod git;
pub mod github;
pub mod locator;
pub mod project;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, DevkitConfig};
    pub use crate::context::AppContext;

    // Projects and filters
    pub use crate::filter::{Candidate, Selector, SelectorGroup, SelectorKind, SelectorMode};
    pub use crate::project::{ProjectList, ProjectSpec};

    // Locators
    pub use crate::locator::{Locator, NameResolver, Scheme, SchemeRegistry, SchemeRule};

    // Git
    pub use crate::git::{Checkout, CloneOptions, TempCheckout};
}
