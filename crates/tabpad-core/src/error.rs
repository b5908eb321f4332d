//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] tabpad_storage::StorageError),

    #[error("Document error: {0}")]
    Tab(#[from] tabpad_tabs::TabError),

    #[error("Session error: {0}")]
    Session(#[from] tabpad_session::SessionError),

    #[error("Search error: {0}")]
    Search(#[from] tabpad_search::SearchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No active document")]
    NoActiveDocument,
}
