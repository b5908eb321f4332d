//! Search query and selection types

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::Result;

/// A selection or match, as codepoint offsets.
///
/// `new` orders the ends. Values built field by field or deserialized may be
/// reversed; the engine calls `normalized` before using them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn normalized(self) -> Self {
        Self::new(self.start, self.end)
    }

    pub fn caret(position: usize) -> Self {
        Self::new(position, position)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub pattern: String,
    pub case_sensitive: bool,
    /// Treat `pattern` as a regular expression instead of literal text
    pub use_regex: bool,
}

impl SearchQuery {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn regex(mut self, use_regex: bool) -> Self {
        self.use_regex = use_regex;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    pub fn compile(&self) -> Result<Regex> {
        let pattern = if self.use_regex {
            self.pattern.clone()
        } else {
            regex::escape(&self.pattern)
        };

        Ok(RegexBuilder::new(&pattern)
            .case_insensitive(!self.case_sensitive)
            .build()?)
    }
}
