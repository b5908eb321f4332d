//! Document error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Document name cannot be empty")]
    EmptyName,
}
