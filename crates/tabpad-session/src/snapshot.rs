//! Persisted session format
//!
//! One JSON string in local storage:
//!
//! ```json
//! {
//!   "tabs": [{ "id": "...", "name": "...", "content": "...", "originalContent": "..." }],
//!   "activeTabId": "...",
//!   "tabCounter": 3,
//!   "wordWrap": false,
//!   "fontSize": 13
//! }
//! ```
//!
//! Cursor and scroll positions are not part of the format.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tabpad_tabs::Document;

use crate::error::SessionError;
use crate::preferences::Preferences;
use crate::session::Session;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotTab {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
    /// Baseline text; absent means the tab was clean
    #[serde(default)]
    pub original_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub tabs: Vec<SnapshotTab>,
    #[serde(default)]
    pub active_tab_id: Option<String>,
    #[serde(default)]
    pub tab_counter: u64,
    #[serde(default)]
    pub word_wrap: bool,
    #[serde(default)]
    pub font_size: Option<i64>,
}

impl Snapshot {
    pub fn capture(session: &Session) -> Self {
        Self {
            tabs: session
                .documents()
                .iter()
                .map(|document| SnapshotTab {
                    id: document.id.clone(),
                    name: document.name.clone(),
                    content: document.content.clone(),
                    original_content: Some(document.baseline_content.clone()),
                })
                .collect(),
            active_tab_id: session.active_id().map(str::to_string),
            tab_counter: session.id_counter(),
            word_wrap: session.preferences().word_wrap,
            font_size: Some(session.preferences().font_size as i64),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild a session.
    ///
    /// Duplicate ids keep their first occurrence. A missing or stale active
    /// id falls back to the first document. A missing or zero font size
    /// becomes `default_font_size`.
    pub fn into_session(self, default_font_size: u32) -> Result<Session> {
        let mut seen = HashSet::new();
        let documents: Vec<Document> = self
            .tabs
            .into_iter()
            .filter(|tab| seen.insert(tab.id.clone()))
            .map(|tab| Document::restored(tab.id, tab.name, tab.content, tab.original_content))
            .collect();

        let Some(first) = documents.first() else {
            return Err(SessionError::EmptySnapshot);
        };

        let active_id = match self.active_tab_id {
            Some(id) if documents.iter().any(|d| d.id == id) => id,
            _ => first.id.clone(),
        };

        let font_size = match self.font_size {
            Some(size) if size != 0 => size,
            _ => default_font_size as i64,
        };

        let preferences = Preferences {
            word_wrap: self.word_wrap,
            font_size: Preferences::clamp_font_size(font_size),
        };

        Ok(Session::from_parts(
            documents,
            Some(active_id),
            self.tab_counter,
            preferences,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::DEFAULT_FONT_SIZE;
    use tabpad_tabs::{BufferSurface, Viewport};

    #[test]
    fn test_wire_field_names() {
        let mut session = Session::default();
        let mut surface = BufferSurface::new();
        session.create(Some("a.txt"), "alpha", &mut surface);

        let json = Snapshot::capture(&session).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["tabs"][0]["originalContent"].is_string());
        assert!(value["activeTabId"].is_string());
        assert_eq!(value["tabCounter"], 1);
        assert_eq!(value["wordWrap"], false);
        assert_eq!(value["fontSize"], 13);
        assert!(value["tabs"][0].get("cursorStart").is_none());
    }

    #[test]
    fn test_capture_restore_preserves_documents() {
        let mut session = Session::default();
        let mut surface = BufferSurface::new();
        let a = session.create(Some("a"), "alpha", &mut surface).id.clone();
        let b = session.create(Some("b"), "beta", &mut surface).id.clone();
        session.edit(&b, "beta, edited".to_string());
        session.preferences_mut().word_wrap = true;
        session.preferences_mut().set_font_size(20);
        session.switch_active(&a, &mut surface);
        surface.input("alpha", Viewport::selection(1, 3));
        surface.scroll_to(80.0, 4.0);
        session.sync_from_surface(&surface);

        let restored = Snapshot::capture(&session)
            .into_session(DEFAULT_FONT_SIZE)
            .unwrap();

        assert_eq!(restored.active_id(), Some(a.as_str()));
        assert_eq!(restored.id_counter(), 2);
        assert!(restored.preferences().word_wrap);
        assert_eq!(restored.preferences().font_size, 20);

        for (before, after) in session.documents().iter().zip(restored.documents()) {
            assert_eq!(before.id, after.id);
            assert_eq!(before.name, after.name);
            assert_eq!(before.content, after.content);
            assert_eq!(before.baseline_content, after.baseline_content);
            assert_eq!(after.viewport, Viewport::default());
        }
        assert!(restored.get(&b).unwrap().is_modified());
    }

    #[test]
    fn test_empty_tabs_rejected() {
        let snapshot = Snapshot::from_json(r#"{"tabs":[],"activeTabId":null}"#).unwrap();
        assert!(matches!(
            snapshot.into_session(DEFAULT_FONT_SIZE),
            Err(SessionError::EmptySnapshot)
        ));

        let snapshot = Snapshot::from_json("{}").unwrap();
        assert!(snapshot.into_session(DEFAULT_FONT_SIZE).is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let snapshot = Snapshot::from_json(
            r#"{"tabs":[{"id":"t1","name":"n","content":"c"}],"activeTabId":"gone"}"#,
        )
        .unwrap();
        let session = snapshot.into_session(DEFAULT_FONT_SIZE).unwrap();

        assert_eq!(session.active_id(), Some("t1"));
        assert_eq!(session.id_counter(), 0);
        assert!(!session.preferences().word_wrap);
        assert_eq!(session.preferences().font_size, DEFAULT_FONT_SIZE);
        assert!(!session.documents()[0].is_modified());
    }

    #[test]
    fn test_empty_original_content_restores_clean() {
        let snapshot = Snapshot::from_json(
            r#"{"tabs":[{"id":"t1","name":"Untitled 1","content":"hello","originalContent":""}]}"#,
        )
        .unwrap();
        let session = snapshot.into_session(DEFAULT_FONT_SIZE).unwrap();

        assert!(!session.documents()[0].is_modified());
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_font_size_clamped_on_restore() {
        let snapshot =
            Snapshot::from_json(r#"{"tabs":[{"id":"t1"}],"fontSize":99}"#).unwrap();
        let session = snapshot.into_session(DEFAULT_FONT_SIZE).unwrap();
        assert_eq!(session.preferences().font_size, 32);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let snapshot = Snapshot::from_json(
            r#"{"tabs":[{"id":"t1","content":"first"},{"id":"t1","content":"second"}]}"#,
        )
        .unwrap();
        let session = snapshot.into_session(DEFAULT_FONT_SIZE).unwrap();
        assert_eq!(session.len(), 1);
        assert_eq!(session.documents()[0].content, "first");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Snapshot::from_json("{not json"),
            Err(SessionError::Json(_))
        ));
    }
}
