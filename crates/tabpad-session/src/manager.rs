//! Session Manager
//!
//! Command interface over a [`Session`] plus its persistence: every mutation
//! schedules a debounced snapshot write, `persist` writes immediately, and
//! `restore` reads the last snapshot back.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;

use tabpad_storage::KeyValueStore;
use tabpad_tabs::{Document, DocumentStatus, EditingSurface};

use crate::debounce::Debouncer;
use crate::error::SessionError;
use crate::preferences::{Preferences, DEFAULT_FONT_SIZE};
use crate::session::{CloseOutcome, SavedDocument, Session};
use crate::snapshot::Snapshot;
use crate::Result;

/// Storage key holding the session snapshot
pub const SNAPSHOT_KEY: &str = "notepad-data";

pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(1000);

/// Outcome of the most recent snapshot write, for the host's status indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PersistStatus {
    Idle,
    Saved { at: DateTime<Utc> },
    Failed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnloadReport {
    /// The host should ask before letting the page close
    pub has_unsaved_changes: bool,
    pub persisted: bool,
}

pub struct SessionManager {
    session: Arc<RwLock<Session>>,
    /// Local storage for snapshots
    store: Arc<dyn KeyValueStore>,
    debouncer: Arc<Mutex<Debouncer>>,
    status: Arc<RwLock<PersistStatus>>,
    /// Wakes the autosave task on every mutation
    signal: Arc<Notify>,
    default_font_size: u32,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>, interval: Duration) -> Self {
        Self::with_font_size(store, interval, DEFAULT_FONT_SIZE)
    }

    pub fn with_font_size(
        store: Arc<dyn KeyValueStore>,
        interval: Duration,
        default_font_size: u32,
    ) -> Self {
        let preferences = Preferences {
            word_wrap: false,
            font_size: Preferences::clamp_font_size(default_font_size as i64),
        };

        Self {
            session: Arc::new(RwLock::new(Session::new(preferences))),
            store,
            debouncer: Arc::new(Mutex::new(Debouncer::new(interval))),
            status: Arc::new(RwLock::new(PersistStatus::Idle)),
            signal: Arc::new(Notify::new()),
            default_font_size,
        }
    }

    // === Queries ===

    pub fn documents(&self) -> Vec<Document> {
        self.session.read().documents().to_vec()
    }

    pub fn document_count(&self) -> usize {
        self.session.read().len()
    }

    pub fn get_document(&self, id: &str) -> Option<Document> {
        self.session.read().get(id).cloned()
    }

    pub fn active_id(&self) -> Option<String> {
        self.session.read().active_id().map(str::to_string)
    }

    pub fn active_document(&self) -> Option<Document> {
        self.session.read().active().cloned()
    }

    pub fn preferences(&self) -> Preferences {
        *self.session.read().preferences()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.session.read().has_unsaved_changes()
    }

    pub fn status(&self) -> PersistStatus {
        self.status.read().clone()
    }

    pub fn autosave_interval(&self) -> Duration {
        self.debouncer.lock().interval()
    }

    pub fn has_pending_flush(&self) -> bool {
        self.debouncer.lock().is_pending()
    }

    /// Read access to the whole session
    pub fn with_session<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Session) -> T,
    {
        f(&self.session.read())
    }

    // === Commands ===

    pub fn create(
        &self,
        name: Option<&str>,
        content: &str,
        surface: &mut dyn EditingSurface,
    ) -> Document {
        let document = self.session.write().create(name, content, surface).clone();

        tracing::info!(tab_id = %document.id, name = %document.name, "Created document");

        self.schedule_persist();
        document
    }

    pub fn switch_active(&self, id: &str, surface: &mut dyn EditingSurface) -> bool {
        let switched = self.session.write().switch_active(id, surface);

        if switched {
            tracing::debug!(tab_id = %id, "Switched document");
            self.schedule_persist();
        }
        switched
    }

    pub fn close(
        &self,
        id: &str,
        confirmed: bool,
        surface: &mut dyn EditingSurface,
    ) -> Result<CloseOutcome> {
        let outcome = self.session.write().close(id, confirmed, surface)?;

        if outcome == CloseOutcome::Closed {
            tracing::info!(tab_id = %id, "Closed document");
            self.schedule_persist();
        }
        Ok(outcome)
    }

    pub fn rename(&self, id: &str, name: &str) -> bool {
        let renamed = self.session.write().rename(id, name);

        if renamed {
            tracing::info!(tab_id = %id, "Renamed document");
            self.schedule_persist();
        }
        renamed
    }

    /// Record an input event. Returns `None` for an unknown id.
    pub fn edit(&self, id: &str, content: String) -> Option<DocumentStatus> {
        let status = self.session.write().edit(id, content)?;
        self.schedule_persist();
        Some(status)
    }

    pub fn save(&self, id: &str) -> Option<SavedDocument> {
        let saved = self.session.write().save(id)?;

        tracing::info!(tab_id = %id, file_name = %saved.file_name, "Saved document");

        self.schedule_persist();
        Some(saved)
    }

    /// Refresh the active document from the surface without scheduling a write
    pub fn sync_from_surface(&self, surface: &dyn EditingSurface) {
        self.session.write().sync_from_surface(surface);
    }

    pub fn set_word_wrap(&self, enabled: bool) {
        self.session.write().preferences_mut().word_wrap = enabled;
        self.schedule_persist();
    }

    pub fn toggle_word_wrap(&self) -> bool {
        let enabled = {
            let mut session = self.session.write();
            let prefs = session.preferences_mut();
            prefs.word_wrap = !prefs.word_wrap;
            prefs.word_wrap
        };
        self.schedule_persist();
        enabled
    }

    /// Set the font size; the applied (clamped) size is returned
    pub fn set_font_size(&self, size: i64) -> u32 {
        let applied = self.session.write().preferences_mut().set_font_size(size);
        self.schedule_persist();
        applied
    }

    pub fn increase_font_size(&self) -> u32 {
        let applied = self.session.write().preferences_mut().step_font_size(1);
        self.schedule_persist();
        applied
    }

    pub fn decrease_font_size(&self) -> u32 {
        let applied = self.session.write().preferences_mut().step_font_size(-1);
        self.schedule_persist();
        applied
    }

    // === Persistence ===

    /// Replace the session with the stored snapshot and load its active
    /// document into the surface.
    ///
    /// Returns false, leaving the current session untouched, when there is no
    /// snapshot, it cannot be read or parsed, or it holds no documents.
    pub fn restore(&self, surface: &mut dyn EditingSurface) -> bool {
        let raw = match self.store.get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session snapshot");
                *self.status.write() = PersistStatus::Failed {
                    reason: e.to_string(),
                };
                return false;
            }
        };

        let restored = Snapshot::from_json(&raw)
            .and_then(|snapshot| snapshot.into_session(self.default_font_size));

        let restored = match restored {
            Ok(session) => session,
            // No documents stored: a normal fresh start
            Err(SessionError::EmptySnapshot) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unusable session snapshot");
                *self.status.write() = PersistStatus::Failed {
                    reason: e.to_string(),
                };
                return false;
            }
        };

        if let Some(active) = restored.active() {
            surface.load(&active.content, active.viewport);
        }

        tracing::info!(
            tab_count = restored.len(),
            active_tab = ?restored.active_id(),
            "Restored session"
        );

        *self.session.write() = restored;
        true
    }

    /// Write the snapshot now, cancelling any pending debounced write
    pub fn persist(&self) -> Result<()> {
        self.debouncer.lock().cancel();

        let json = Snapshot::capture(&self.session.read()).to_json()?;

        match self.store.set(SNAPSHOT_KEY, &json) {
            Ok(()) => {
                tracing::debug!(bytes = json.len(), "Persisted session");
                *self.status.write() = PersistStatus::Saved { at: Utc::now() };
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist session");
                *self.status.write() = PersistStatus::Failed {
                    reason: e.to_string(),
                };
                Err(e.into())
            }
        }
    }

    /// Write the snapshot if the quiet interval has elapsed by `now`.
    ///
    /// Returns true when a write was attempted.
    pub fn flush_if_due(&self, now: Instant) -> bool {
        if !self.debouncer.lock().poll(now) {
            return false;
        }
        // Failures are already logged and reflected in `status`
        let _ = self.persist();
        true
    }

    /// Write the snapshot if a write is pending, regardless of its deadline
    pub fn flush_pending(&self) -> bool {
        if !self.has_pending_flush() {
            return false;
        }
        let _ = self.persist();
        true
    }

    /// Page is closing: write synchronously and report whether to warn
    pub fn prepare_unload(&self) -> UnloadReport {
        let persisted = self.persist().is_ok();

        UnloadReport {
            has_unsaved_changes: self.has_unsaved_changes(),
            persisted,
        }
    }

    pub(crate) fn persist_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.signal)
    }

    fn schedule_persist(&self) {
        self.debouncer.lock().schedule(Instant::now());
        self.signal.notify_one();
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            store: Arc::clone(&self.store),
            debouncer: Arc::clone(&self.debouncer),
            status: Arc::clone(&self.status),
            signal: Arc::clone(&self.signal),
            default_font_size: self.default_font_size,
        }
    }
}
