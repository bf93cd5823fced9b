//! Project specification types.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// Error raised when a project list line does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The line has no project name.
    #[error("project line has no name: '{line}'")]
    MissingName { line: String },
    /// A `[` or `(` group is never closed.
    #[error("unterminated '{open}' in project line: '{line}'")]
    Unterminated { open: char, line: String },
    /// Text after the name that is neither a tag nor a topic group.
    #[error("unexpected '{text}' in project line: '{line}'")]
    UnexpectedText { text: String, line: String },
    /// A line-level error located within a document.
    #[error("line {number}: {source}")]
    AtLine {
        number: usize,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach a 1-based line number.
    pub fn at_line(self, number: usize) -> Self {
        Self::AtLine {
            number,
            source: Box::new(self),
        }
    }
}

/// One parsed line of a project list.
///
/// Equality and hashing consider only the name, so collections of
/// specs deduplicate by project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSpec {
    name: String,
    tags: Vec<String>,
    topics: Vec<String>,
}

impl ProjectSpec {
    /// Create a spec with no tags or topics.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            topics: Vec::new(),
        }
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the topics.
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a project line.
    ///
    /// Supports formats:
    /// - `name`
    /// - `name [tag1] [tag2]`
    /// - `name [tag] (topic1, topic2)`
    ///
    /// Tags come first; a single topic group, if present, ends the line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let trimmed = line.trim();
        let (name, mut rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (trimmed, ""),
        };

        if name.is_empty() || name.starts_with('[') || name.starts_with('(') {
            return Err(ParseError::MissingName {
                line: line.to_string(),
            });
        }

        let mut tags = Vec::new();
        let mut topics = Vec::new();
        let mut topics_seen = false;

        while let Some(open) = rest.chars().next() {
            let close = match open {
                '[' if !topics_seen => ']',
                '(' if !topics_seen => ')',
                _ => {
                    let text = rest.split_whitespace().next().unwrap_or(rest);
                    return Err(ParseError::UnexpectedText {
                        text: text.to_string(),
                        line: line.to_string(),
                    });
                }
            };

            let Some(end) = rest.find(close) else {
                return Err(ParseError::Unterminated {
                    open,
                    line: line.to_string(),
                });
            };

            let inner = &rest[1..end];
            if open == '[' {
                tags.push(inner.trim().to_string());
            } else {
                topics_seen = true;
                topics.extend(
                    inner
                        .split(',')
                        .map(str::trim)
                        .filter(|topic| !topic.is_empty())
                        .map(str::to_string),
                );
            }

            rest = rest[end + 1..].trim_start();
        }

        Ok(Self {
            name: name.to_string(),
            tags,
            topics,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Check whether the project carries a tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Last path segment of the name (`/python/cpython` -> `cpython`).
    pub fn basename(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Render the canonical project list line.
    pub fn spec(&self) -> String {
        let mut line = self.name.clone();
        for tag in &self.tags {
            line.push_str(&format!(" [{}]", tag));
        }
        if !self.topics.is_empty() {
            line.push_str(&format!(" ({})", self.topics.join(", ")));
        }
        line
    }
}

impl PartialEq for ProjectSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ProjectSpec {}

impl Hash for ProjectSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for ProjectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl std::str::FromStr for ProjectSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
