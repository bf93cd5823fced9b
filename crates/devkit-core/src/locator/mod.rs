//! Repository locator resolution.
//!
//! This module turns short project names into fetchable repository
//! addresses. It handles:
//! - Scheme substitution rules from git's `insteadOf` configuration
//! - Expanding and contracting locators between short and full forms
//! - Qualifying bare names with the default owner

mod address;
mod resolver;
mod scheme;

pub use address::Locator;
pub use resolver::{DEFAULT_HOST, NameResolver};
pub use scheme::{
    GitConfigSource, Scheme, SchemeRegistry, SchemeRule, SchemeSource, StaticSource,
};
