//! Find / replace engine

use regex::{NoExpand, Regex};
use serde::Serialize;

use crate::offsets::{byte_to_char, char_to_byte};
use crate::query::{SearchQuery, Selection};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaceOneOutcome {
    /// New buffer, or `None` when the selection did not match
    pub text: Option<String>,
    /// Selection to show afterwards: the next match if there is one
    pub selection: Selection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaceAllOutcome {
    pub text: String,
    pub replaced: usize,
}

/// Search engine with a one-entry cache of the last compiled query
#[derive(Debug, Default)]
pub struct SearchEngine {
    cached_regex: Option<(SearchQuery, Regex)>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matches in `text`; an empty query matches nothing
    pub fn count(&mut self, query: &SearchQuery, text: &str) -> Result<usize> {
        if query.is_empty() {
            return Ok(0);
        }
        let regex = self.regex(query)?;
        Ok(regex.find_iter(text).count())
    }

    /// First match starting at or after the end of `selection`, wrapping
    /// around to the start of the buffer.
    pub fn find_next(
        &mut self,
        query: &SearchQuery,
        text: &str,
        selection: Selection,
    ) -> Result<Option<Selection>> {
        let selection = selection.normalized();
        if query.is_empty() {
            return Ok(None);
        }
        let regex = self.regex(query)?;
        Ok(next_match(&regex, text, selection))
    }

    /// Last match starting before the start of `selection`, wrapping around
    /// to the last match in the buffer.
    pub fn find_previous(
        &mut self,
        query: &SearchQuery,
        text: &str,
        selection: Selection,
    ) -> Result<Option<Selection>> {
        let selection = selection.normalized();
        if query.is_empty() {
            return Ok(None);
        }
        let regex = self.regex(query)?;

        let before = char_to_byte(text, selection.start);
        let found = regex
            .find_iter(text)
            .take_while(|m| m.start() < before)
            .last()
            .or_else(|| regex.find_iter(text).last());

        Ok(found.map(|m| to_selection(text, m.start(), m.end())))
    }

    /// Replace the current selection, but only when the selected text itself
    /// contains a match; then move on to the next match.
    ///
    /// The replacement is inserted literally.
    pub fn replace_one(
        &mut self,
        query: &SearchQuery,
        text: &str,
        selection: Selection,
        replacement: &str,
    ) -> Result<ReplaceOneOutcome> {
        let selection = selection.normalized();
        if query.is_empty() {
            return Ok(ReplaceOneOutcome {
                text: None,
                selection,
            });
        }
        let regex = self.regex(query)?;

        let start = char_to_byte(text, selection.start);
        let end = char_to_byte(text, selection.end);

        let mut selection = selection;
        let replaced = if regex.is_match(&text[start..end]) {
            let mut buffer =
                String::with_capacity(text.len() - (end - start) + replacement.len());
            buffer.push_str(&text[..start]);
            buffer.push_str(replacement);
            buffer.push_str(&text[end..]);

            selection = Selection::new(
                selection.start,
                selection.start + replacement.chars().count(),
            );
            Some(buffer)
        } else {
            None
        };

        let current = replaced.as_deref().unwrap_or(text);
        if let Some(next) = next_match(&regex, current, selection) {
            selection = next;
        }

        Ok(ReplaceOneOutcome {
            text: replaced,
            selection,
        })
    }

    /// Replace every match.
    ///
    /// Regex queries expand `$1` / `${name}` capture references in the
    /// replacement; literal queries insert it as-is.
    pub fn replace_all(
        &mut self,
        query: &SearchQuery,
        text: &str,
        replacement: &str,
    ) -> Result<ReplaceAllOutcome> {
        if query.is_empty() {
            return Ok(ReplaceAllOutcome {
                text: text.to_string(),
                replaced: 0,
            });
        }
        let regex = self.regex(query)?;

        let replaced = regex.find_iter(text).count();
        let text = if query.use_regex {
            regex.replace_all(text, replacement).into_owned()
        } else {
            regex.replace_all(text, NoExpand(replacement)).into_owned()
        };

        tracing::debug!(replaced, "Replaced all matches");

        Ok(ReplaceAllOutcome { text, replaced })
    }

    fn regex(&mut self, query: &SearchQuery) -> Result<Regex> {
        if let Some((cached_query, regex)) = &self.cached_regex {
            if cached_query == query {
                return Ok(regex.clone());
            }
        }

        let regex = query.compile()?;
        self.cached_regex = Some((query.clone(), regex.clone()));
        Ok(regex)
    }
}

fn next_match(regex: &Regex, text: &str, selection: Selection) -> Option<Selection> {
    let from = char_to_byte(text, selection.end);
    regex
        .find_at(text, from)
        .or_else(|| regex.find(text))
        .map(|m| to_selection(text, m.start(), m.end()))
}

fn to_selection(text: &str, start: usize, end: usize) -> Selection {
    let start_char = byte_to_char(text, start);
    Selection::new(start_char, start_char + text[start..end].chars().count())
}
