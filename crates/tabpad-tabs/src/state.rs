//! Document status
//!
//! ```text
//! Clean  --edit-->  Modified
//!   ^                  |
//!   +------save--------+
//! ```
//! Editing back to the saved text also returns a document to `Clean`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Buffer matches the last saved or loaded text
    Clean,
    /// Buffer differs from the last saved or loaded text
    Modified,
}

impl DocumentStatus {
    pub fn from_modified(modified: bool) -> Self {
        if modified {
            DocumentStatus::Modified
        } else {
            DocumentStatus::Clean
        }
    }

    pub fn is_modified(&self) -> bool {
        matches!(self, DocumentStatus::Modified)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Clean => "clean",
            DocumentStatus::Modified => "modified",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clean" => Ok(DocumentStatus::Clean),
            "modified" => Ok(DocumentStatus::Modified),
            _ => Err(format!("Unknown document status: {}", s)),
        }
    }
}
