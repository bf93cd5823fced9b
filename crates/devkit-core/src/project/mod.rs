//! Project lists.
//!
//! A project list is a plain text document with one project per line:
//!
//! ```text
//! /pypa/setuptools [lifted]
//! keyring [lifted] (keyring, secrets)
//! jaraco.develop
//! ```
//!
//! Each line becomes a [`ProjectSpec`]; a whole document becomes a
//! [`ProjectList`], which can be loaded from disk or over HTTP.

mod list;
mod spec;

pub use list::ProjectList;
pub use spec::{ParseError, ProjectSpec};
