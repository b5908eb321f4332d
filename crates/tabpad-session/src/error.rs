//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] tabpad_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot contains no documents")]
    EmptySnapshot,

    #[error("\"{name}\" has unsaved changes")]
    UnsavedChanges { id: String, name: String },
}
