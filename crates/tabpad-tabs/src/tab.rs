//! Document data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TabError;
use crate::state::DocumentStatus;
use crate::surface::Viewport;
use crate::Result;

const EXPORT_EXTENSION: &str = ".txt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier, stable for the document's lifetime
    pub id: String,
    /// Display name shown on the tab
    pub name: String,
    /// Current text buffer
    pub content: String,
    /// Text as of the last save or load
    pub baseline_content: String,
    /// Caret and scroll position, restored when the tab is shown again
    #[serde(skip)]
    pub viewport: Viewport,
    /// When the document was opened
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(id: String, name: String, content: String) -> Self {
        let now = Utc::now();

        Self {
            id,
            name,
            baseline_content: content.clone(),
            content,
            viewport: Viewport::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a document read back from storage.
    ///
    /// The viewport is never persisted, so it starts at the top of the buffer.
    /// A missing or empty baseline means the stored text is the saved text.
    pub fn restored(id: String, name: String, content: String, baseline: Option<String>) -> Self {
        let mut document = Self::new(id, name, content);
        if let Some(baseline) = baseline.filter(|b| !b.is_empty()) {
            document.baseline_content = baseline;
        }
        document
    }

    pub fn is_modified(&self) -> bool {
        self.content != self.baseline_content
    }

    pub fn status(&self) -> DocumentStatus {
        DocumentStatus::from_modified(self.is_modified())
    }

    /// Replace the buffer. Called on every input event, so it does no more
    /// than the assignment.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }

    /// Rename the document; surrounding whitespace is dropped
    pub fn rename(&mut self, name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TabError::EmptyName);
        }

        tracing::debug!(tab_id = %self.id, from = %self.name, to = %trimmed, "Renamed document");

        self.name = trimmed.to_string();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mark the current buffer as saved
    pub fn mark_saved(&mut self) {
        self.baseline_content = self.content.clone();
        self.updated_at = Utc::now();
    }

    /// File name used when the document is exported
    pub fn export_file_name(&self) -> String {
        if self.name.ends_with(EXPORT_EXTENSION) {
            self.name.clone()
        } else {
            format!("{}{}", self.name, EXPORT_EXTENSION)
        }
    }
}
