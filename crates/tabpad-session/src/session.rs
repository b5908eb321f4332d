//! Session state
//!
//! Plain, synchronous state: the ordered documents, the active pointer, the
//! id counter and the preferences. Persistence is layered on top by
//! [`SessionManager`](crate::SessionManager).

use serde::Serialize;
use tabpad_tabs::{Document, DocumentStatus, EditingSurface};
use uuid::Uuid;

use crate::error::SessionError;
use crate::preferences::Preferences;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// Stale id; nothing changed
    NotFound,
}

/// What a save hands to the host for the actual file download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedDocument {
    pub id: String,
    pub name: String,
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Tab display order
    documents: Vec<Document>,
    active_id: Option<String>,
    /// Source of default names and id uniqueness; never decreases
    id_counter: u64,
    preferences: Preferences,
}

impl Session {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences,
            ..Self::default()
        }
    }

    pub(crate) fn from_parts(
        documents: Vec<Document>,
        active_id: Option<String>,
        id_counter: u64,
        preferences: Preferences,
    ) -> Self {
        Self {
            documents,
            active_id,
            id_counter,
            preferences,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&Document> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }

    pub fn id_counter(&self) -> u64 {
        self.id_counter
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.documents.iter().any(Document::is_modified)
    }

    /// Open a new document at the end of the tab list and make it active.
    ///
    /// An absent or blank `name` becomes "Untitled N".
    pub fn create(
        &mut self,
        name: Option<&str>,
        content: &str,
        surface: &mut dyn EditingSurface,
    ) -> &Document {
        self.id_counter += 1;
        let counter = self.id_counter;

        let id = format!("tab-{}-{}", counter, Uuid::new_v4().simple());
        let name = match name.filter(|n| !n.trim().is_empty()) {
            Some(name) => name.to_string(),
            None => format!("Untitled {}", counter),
        };

        self.documents
            .push(Document::new(id.clone(), name, content.to_string()));
        self.switch_active(&id, surface);

        &self.documents[self.documents.len() - 1]
    }

    /// Make `id` the active document.
    ///
    /// The outgoing document first takes the surface's text and viewport, then
    /// the incoming document is loaded into the surface. Unknown ids are a no-op.
    pub fn switch_active(&mut self, id: &str, surface: &mut dyn EditingSurface) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        self.sync_from_surface(surface);

        let document = &self.documents[index];
        surface.load(&document.content, document.viewport);
        self.active_id = Some(document.id.clone());

        true
    }

    /// Pull the live text and viewport from the surface into the active document
    pub fn sync_from_surface(&mut self, surface: &dyn EditingSurface) {
        let Some(index) = self.active_id.as_deref().and_then(|id| self.position(id)) else {
            return;
        };

        let document = &mut self.documents[index];
        let content = surface.content();
        if document.content != content {
            document.set_content(content);
        }
        document.viewport = surface.viewport();
    }

    /// Close a document.
    ///
    /// A modified document is only removed when `confirmed` is set. If the
    /// active document goes, the neighbour at the same index (or the new last
    /// one) becomes active; if the list empties, a blank document is opened.
    pub fn close(
        &mut self,
        id: &str,
        confirmed: bool,
        surface: &mut dyn EditingSurface,
    ) -> Result<CloseOutcome> {
        let Some(index) = self.position(id) else {
            return Ok(CloseOutcome::NotFound);
        };

        let was_active = self.active_id.as_deref() == Some(id);
        if was_active {
            self.sync_from_surface(surface);
        }

        let document = &self.documents[index];
        if document.is_modified() && !confirmed {
            return Err(SessionError::UnsavedChanges {
                id: document.id.clone(),
                name: document.name.clone(),
            });
        }

        self.documents.remove(index);

        if self.documents.is_empty() {
            self.active_id = None;
            self.create(None, "", surface);
        } else if was_active {
            // Nothing to sync back: the surface still shows the closed document
            self.active_id = None;
            let next_id = self.documents[index.min(self.documents.len() - 1)]
                .id
                .clone();
            self.switch_active(&next_id, surface);
        }

        Ok(CloseOutcome::Closed)
    }

    /// Rename a document. Blank names and unknown ids leave everything unchanged.
    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        match self.get_mut(id) {
            Some(document) => document.rename(name).is_ok(),
            None => false,
        }
    }

    pub fn edit(&mut self, id: &str, content: String) -> Option<DocumentStatus> {
        let document = self.get_mut(id)?;
        document.set_content(content);
        Some(document.status())
    }

    /// Mark a document clean and hand back what should be written out
    pub fn save(&mut self, id: &str) -> Option<SavedDocument> {
        let document = self.get_mut(id)?;
        document.mark_saved();

        Some(SavedDocument {
            id: document.id.clone(),
            name: document.name.clone(),
            file_name: document.export_file_name(),
            content: document.content.clone(),
        })
    }
}
