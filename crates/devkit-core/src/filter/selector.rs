//! Selector types and group evaluation.

use std::fmt;

use serde::Serialize;

use crate::project::ProjectSpec;

/// Prefix that turns a selector into an exclusion.
pub const NEGATION_MARKER: &str = "not ";

/// Something a selector can be evaluated against.
pub trait Candidate {
    /// Text that keyword selectors search.
    fn display_name(&self) -> &str;

    /// Tags that tag selectors look up.
    fn tags(&self) -> &[String];
}

impl Candidate for ProjectSpec {
    fn display_name(&self) -> &str {
        self.name()
    }

    fn tags(&self) -> &[String] {
        ProjectSpec::tags(self)
    }
}

impl<T: Candidate + ?Sized> Candidate for &T {
    fn display_name(&self) -> &str {
        (**self).display_name()
    }

    fn tags(&self) -> &[String] {
        (**self).tags()
    }
}

/// What a selector inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    /// Substring of the candidate's name
    Keyword,
    /// Membership in the candidate's tags
    Tag,
}

/// Whether a selector admits or rejects what it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorMode {
    Selecting,
    Excluding,
}

/// A single, optionally negated filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    kind: SelectorKind,
    raw: String,
    negated: bool,
    indicator: String,
}

impl Selector {
    /// Parse a selector of the given kind.
    ///
    /// Exactly one leading `not ` marker is stripped; anything left over
    /// (including a second marker) is part of the indicator.
    pub fn parse(kind: SelectorKind, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let (negated, indicator) = match raw.strip_prefix(NEGATION_MARKER) {
            Some(rest) => (true, rest.to_string()),
            None => (false, raw.clone()),
        };
        Self {
            kind,
            raw,
            negated,
            indicator,
        }
    }

    /// Keyword selector: matches candidates whose name contains the indicator.
    pub fn keyword(raw: impl Into<String>) -> Self {
        Self::parse(SelectorKind::Keyword, raw)
    }

    /// Tag selector: matches candidates carrying the indicator as a tag.
    pub fn tag(raw: impl Into<String>) -> Self {
        Self::parse(SelectorKind::Tag, raw)
    }

    pub fn kind(&self) -> SelectorKind {
        self.kind
    }

    /// The text as typed by the user.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The condition text with the negation marker removed.
    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    pub fn mode(&self) -> SelectorMode {
        if self.negated {
            SelectorMode::Excluding
        } else {
            SelectorMode::Selecting
        }
    }

    /// Evaluate the condition, inverted for excluding selectors.
    pub fn matches(&self, candidate: &impl Candidate) -> bool {
        let hit = match self.kind {
            SelectorKind::Keyword => candidate.display_name().contains(&self.indicator),
            SelectorKind::Tag => candidate.tags().iter().any(|tag| *tag == self.indicator),
        };
        hit != self.negated
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// An ordered collection of selectors evaluated together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorGroup {
    selectors: Vec<Selector>,
}

impl SelectorGroup {
    pub fn new(selectors: impl IntoIterator<Item = Selector>) -> Self {
        Self {
            selectors: selectors.into_iter().collect(),
        }
    }

    /// Build a group from raw keyword and tag strings.
    pub fn from_raw<K, T>(keywords: K, tags: T) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        let keywords = keywords.into_iter().map(Selector::keyword);
        let tags = tags.into_iter().map(Selector::tag);
        Self::new(keywords.chain(tags))
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Admit a candidate when any selecting selector matches (or none
    /// exist) and every excluding selector holds.
    pub fn evaluate(&self, candidate: &impl Candidate) -> bool {
        let (selecting, excluding): (Vec<&Selector>, Vec<&Selector>) = self
            .selectors
            .iter()
            .partition(|s| s.mode() == SelectorMode::Selecting);

        (selecting.is_empty() || selecting.iter().any(|s| s.matches(candidate)))
            && excluding.iter().all(|s| s.matches(candidate))
    }

    /// Keep the admitted candidates, preserving order.
    pub fn filter<'a, T, I>(&'a self, candidates: I) -> impl Iterator<Item = T> + 'a
    where
        T: Candidate + 'a,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        candidates
            .into_iter()
            .filter(move |candidate| self.evaluate(candidate))
    }
}

impl FromIterator<Selector> for SelectorGroup {
    fn from_iter<I: IntoIterator<Item = Selector>>(iter: I) -> Self {
        Self::new(iter)
    }
}
