//! Serializable results for hosts that marshal commands over IPC

use serde::{Deserialize, Serialize};

use tabpad_tabs::Document;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: String,
    pub name: String,
    pub modified: bool,
    pub active: bool,
}

impl DocumentInfo {
    pub fn from_document(document: &Document, active_id: Option<&str>) -> Self {
        Self {
            id: document.id.clone(),
            name: document.name.clone(),
            modified: document.is_modified(),
            active: active_id == Some(document.id.as_str()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for CommandResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e),
        }
    }
}
