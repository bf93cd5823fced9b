//! Keyword and tag selectors for choosing projects.
//!
//! A selector is a single condition typed by the user, such as `keyring`
//! or `not lifted`. Selectors are gathered into a [`SelectorGroup`]:
//! a candidate is admitted when any selecting condition matches (or
//! there are none) and no excluding condition does.

mod selector;

pub use selector::{
    Candidate, NEGATION_MARKER, Selector, SelectorGroup, SelectorKind, SelectorMode,
};

#[cfg(test)]
mod tests;
