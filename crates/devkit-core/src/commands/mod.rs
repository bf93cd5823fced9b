//! High-level commands for devkit chores.
//!
//! Each command works over the projects a selector group admits and is
//! designed to be called by the CLI frontend.

pub mod add;
pub mod checkout;
pub mod release;
pub mod run;
pub mod topics;
pub mod update;

pub use add::{AddCommand, AddOptions, AddReport, ProjectsRepo};
pub use checkout::{CheckoutCommand, CheckoutOptions, CheckoutReport};
pub use release::ReleaseCommand;
pub use run::{RunCommand, RunOptions, RunReport};
pub use topics::{TopicsCommand, TopicsReport, TopicsUpdate};
pub use update::{
    DEFAULT_BASE, ProjectUpdate, UpdateCommand, UpdateOptions, UpdateOutcome, UpdateReport,
};
