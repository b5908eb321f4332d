//! Tabpad Find / Replace
//!
//! Plain or regular-expression search over a whole buffer, optionally case
//! sensitive. Positions in and out of this crate are codepoint offsets so
//! they line up with the editing surface's selection.

mod engine;
mod error;
mod offsets;
mod query;

pub use engine::{ReplaceAllOutcome, ReplaceOneOutcome, SearchEngine};
pub use error::SearchError;
pub use offsets::{byte_to_char, char_to_byte};
pub use query::{SearchQuery, Selection};

pub type Result<T> = std::result::Result<T, SearchError>;
