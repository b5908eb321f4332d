//! Search error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
