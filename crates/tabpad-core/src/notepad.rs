//! Main notepad state container
//!
//! Owns the session, the editing surface and the preferences that live
//! outside the session snapshot. The host renders; everything it shows is
//! read from here.

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tabpad_search::{ReplaceOneOutcome, SearchEngine, SearchQuery, Selection};
use tabpad_session::{
    spawn_autosave, AutosaveHandle, CloseOutcome, PersistStatus, Preferences, SessionManager,
    UnloadReport,
};
use tabpad_storage::{Database, KeyValueStore, MemoryStore};
use tabpad_tabs::{BufferSurface, Document, DocumentStatus, EditingSurface, TabError, Viewport};

use crate::commands::DocumentInfo;
use crate::config::Config;
use crate::editing::{indent, unindent, TextEdit};
use crate::error::CoreError;
use crate::files::{read_text_file, write_export, ExportedFile};
use crate::stats::TextStats;
use crate::theme::{Theme, THEME_KEY};
use crate::Result;

pub const WELCOME_NAME: &str = "Welcome.txt";

const WELCOME_TEXT: &str = "Welcome to Tabpad!

Shortcuts
  Ctrl + N   new document
  Ctrl + O   open a file
  Ctrl + S   save (download) the current document
  Ctrl + W   close the current tab
  Ctrl + F   find / replace
  Tab        indent

Also
  - drop files onto the editor to open them
  - double-click a tab title to rename it
  - everything is kept between reloads
  - switch between dark and light themes

Edit this document freely.
";

type Surface = Box<dyn EditingSurface + Send + Sync>;

/// Result of counting matches for the find panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FindStatus {
    Matches { count: usize },
    InvalidPattern { message: String },
}

/// Everything the status bar shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub stats: TextStats,
    pub modified: bool,
    pub persist: PersistStatus,
    pub word_wrap: bool,
    pub font_size: u32,
    pub theme: Theme,
}

/// Main notepad instance
pub struct Notepad {
    config: Config,
    /// Local storage shared with the session manager
    store: Arc<dyn KeyValueStore>,
    session_manager: SessionManager,
    /// Live text of the active document
    surface: Arc<RwLock<Surface>>,
    search: Arc<Mutex<SearchEngine>>,
    theme: Arc<RwLock<Theme>>,
}

impl Notepad {
    /// Open the notepad over the SQLite database named in `config`
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;

        Ok(Self::with_store(
            config,
            Arc::new(db),
            Box::new(BufferSurface::new()),
        ))
    }

    /// Notepad without durable storage, e.g. when the database cannot be opened
    pub fn in_memory(config: Config) -> Self {
        Self::with_store(
            config,
            Arc::new(MemoryStore::new()),
            Box::new(BufferSurface::new()),
        )
    }

    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>, surface: Surface) -> Self {
        let session_manager = SessionManager::with_font_size(
            Arc::clone(&store),
            config.autosave_interval(),
            config.default_font_size,
        );

        Self {
            config,
            store,
            session_manager,
            surface: Arc::new(RwLock::new(surface)),
            search: Arc::new(Mutex::new(SearchEngine::new())),
            theme: Arc::new(RwLock::new(Theme::default())),
        }
    }

    /// Load the theme and the last session, or open a first document.
    ///
    /// Returns true when a previous session was restored.
    pub fn initialize(&self) -> bool {
        self.load_theme();

        let restored = self.with_surface(|surface| self.session_manager.restore(surface));
        if !restored {
            if self.config.welcome_document {
                self.open_text(WELCOME_NAME, WELCOME_TEXT);
            } else {
                self.new_document();
            }
        }

        tracing::info!(
            restored,
            documents = self.session_manager.document_count(),
            "Notepad initialized"
        );

        restored
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.session_manager
    }

    /// Run the debounced autosave on the current tokio runtime
    pub fn spawn_autosave(&self) -> AutosaveHandle {
        spawn_autosave(self.session_manager.clone())
    }

    // === Documents ===

    pub fn documents(&self) -> Vec<DocumentInfo> {
        self.session_manager.with_session(|session| {
            session
                .documents()
                .iter()
                .map(|document| DocumentInfo::from_document(document, session.active_id()))
                .collect()
        })
    }

    pub fn active_document(&self) -> Option<Document> {
        self.session_manager.active_document()
    }

    pub fn new_document(&self) -> Document {
        self.with_surface(|surface| self.session_manager.create(None, "", surface))
    }

    pub fn open_text(&self, name: &str, content: &str) -> Document {
        self.with_surface(|surface| self.session_manager.create(Some(name), content, surface))
    }

    /// Open a file from disk as a new document named after the file
    pub fn open_file(&self, path: &Path) -> Result<Document> {
        let (name, content) = read_text_file(path)?;
        Ok(self.open_text(&name, &content))
    }

    /// Open each file as its own document, in order. A failure does not stop
    /// the remaining files; the last one opened ends up active.
    pub fn open_files<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<Result<Document>> {
        paths
            .iter()
            .map(|path| self.open_file(path.as_ref()))
            .collect()
    }

    pub fn switch_document(&self, id: &str) -> bool {
        self.with_surface(|surface| self.session_manager.switch_active(id, surface))
    }

    /// Close a document; modified documents need `confirmed`
    pub fn close_document(&self, id: &str, confirmed: bool) -> Result<CloseOutcome> {
        Ok(self.with_surface(|surface| self.session_manager.close(id, confirmed, surface))?)
    }

    /// Close the active document (Ctrl+W)
    pub fn close_active(&self, confirmed: bool) -> Result<CloseOutcome> {
        match self.session_manager.active_id() {
            Some(id) => self.close_document(&id, confirmed),
            None => Ok(CloseOutcome::NotFound),
        }
    }

    pub fn rename_document(&self, id: &str, name: &str) -> bool {
        self.session_manager.rename(id, name)
    }

    // === Editing ===

    /// Type into the surface: replace its text and caret, then record the edit
    pub fn input(&self, content: &str, viewport: Viewport) -> Option<DocumentStatus> {
        self.surface.write().load(content, viewport);
        self.on_input()
    }

    /// The surface's text changed; copy it into the active document
    pub fn on_input(&self) -> Option<DocumentStatus> {
        let id = self.session_manager.active_id()?;
        let content = self.surface.read().content();
        self.session_manager.edit(&id, content)
    }

    pub fn select(&self, start: usize, end: usize) {
        let mut surface = self.surface.write();
        let content = surface.content();
        let viewport = Viewport {
            cursor_start: start,
            cursor_end: end,
            ..surface.viewport()
        };
        surface.load(&content, viewport);
    }

    pub fn surface_content(&self) -> String {
        self.surface.read().content()
    }

    pub fn surface_viewport(&self) -> Viewport {
        self.surface.read().viewport()
    }

    /// Tab key
    pub fn indent(&self) -> Option<DocumentStatus> {
        let (text, selection) = self.surface_state();
        let edit = indent(&text, selection);
        self.apply_text_edit(edit)
    }

    /// Shift+Tab; `None` when the caret's line has no indent to remove
    pub fn unindent(&self) -> Option<DocumentStatus> {
        let (text, selection) = self.surface_state();
        let edit = unindent(&text, selection.start)?;
        self.apply_text_edit(edit)
    }

    // === Files ===

    /// Mark the active document saved and return what to download
    pub fn save_active(&self) -> Result<ExportedFile> {
        self.sync_from_surface();

        let id = self
            .session_manager
            .active_id()
            .ok_or(CoreError::NoActiveDocument)?;
        let saved = self
            .session_manager
            .save(&id)
            .ok_or_else(|| TabError::NotFound(id.clone()))?;

        Ok(saved.into())
    }

    /// Save the active document and write it to `dir`, or the configured
    /// export directory
    pub fn export_active(&self, dir: Option<&Path>) -> Result<PathBuf> {
        let exported = self.save_active()?;
        let dir = dir.unwrap_or(self.config.export_dir.as_path());
        write_export(dir, &exported)
    }

    // === Preferences ===

    pub fn preferences(&self) -> Preferences {
        self.session_manager.preferences()
    }

    pub fn toggle_word_wrap(&self) -> bool {
        self.session_manager.toggle_word_wrap()
    }

    pub fn increase_font_size(&self) -> u32 {
        self.session_manager.increase_font_size()
    }

    pub fn decrease_font_size(&self) -> u32 {
        self.session_manager.decrease_font_size()
    }

    pub fn theme(&self) -> Theme {
        *self.theme.read()
    }

    pub fn toggle_theme(&self) -> Theme {
        let theme = {
            let mut current = self.theme.write();
            *current = current.toggled();
            *current
        };

        if let Err(e) = self.store.set(THEME_KEY, theme.as_str()) {
            tracing::warn!(error = %e, "Failed to store theme");
        }

        theme
    }

    fn load_theme(&self) {
        match self.store.get(THEME_KEY) {
            Ok(Some(value)) => match value.parse() {
                Ok(theme) => *self.theme.write() = theme,
                Err(e) => tracing::warn!(error = %e, "Ignoring stored theme"),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read theme"),
        }
    }

    // === Find / replace ===

    pub fn find_count(&self, query: &SearchQuery) -> FindStatus {
        let text = self.surface.read().content();
        match self.search.lock().count(query, &text) {
            Ok(count) => FindStatus::Matches { count },
            Err(e) => FindStatus::InvalidPattern {
                message: e.to_string(),
            },
        }
    }

    /// Select the next match after the current selection
    pub fn find_next(&self, query: &SearchQuery) -> Result<Option<Selection>> {
        let (text, selection) = self.surface_state();
        let found = self.search.lock().find_next(query, &text, selection)?;
        if let Some(found) = found {
            self.select(found.start, found.end);
        }
        Ok(found)
    }

    pub fn find_previous(&self, query: &SearchQuery) -> Result<Option<Selection>> {
        let (text, selection) = self.surface_state();
        let found = self.search.lock().find_previous(query, &text, selection)?;
        if let Some(found) = found {
            self.select(found.start, found.end);
        }
        Ok(found)
    }

    /// Replace the selection if it matches, then select the next match
    pub fn replace_one(&self, query: &SearchQuery, replacement: &str) -> Result<ReplaceOneOutcome> {
        let (text, selection) = self.surface_state();
        let outcome = self
            .search
            .lock()
            .replace_one(query, &text, selection, replacement)?;

        match &outcome.text {
            Some(replaced) => {
                let viewport = Viewport {
                    cursor_start: outcome.selection.start,
                    cursor_end: outcome.selection.end,
                    ..self.surface_viewport()
                };
                self.input(replaced, viewport);
            }
            None => self.select(outcome.selection.start, outcome.selection.end),
        }

        Ok(outcome)
    }

    /// Replace every match; returns how many were replaced
    pub fn replace_all(&self, query: &SearchQuery, replacement: &str) -> Result<usize> {
        let text = self.surface.read().content();
        let outcome = self.search.lock().replace_all(query, &text, replacement)?;

        if outcome.replaced > 0 {
            let viewport = self.surface_viewport();
            self.input(&outcome.text, viewport);
        }

        Ok(outcome.replaced)
    }

    // === Status and lifecycle ===

    pub fn status(&self) -> StatusReport {
        let (text, selection) = self.surface_state();
        let preferences = self.preferences();

        StatusReport {
            stats: TextStats::compute(&text, selection.start),
            modified: self
                .active_document()
                .map(|document| document.is_modified())
                .unwrap_or(false),
            persist: self.session_manager.status(),
            word_wrap: preferences.word_wrap,
            font_size: preferences.font_size,
            theme: self.theme(),
        }
    }

    /// Drive the debounced autosave from the host's own timer.
    ///
    /// Returns true when a write was attempted.
    pub fn tick(&self, now: Instant) -> bool {
        if !self.session_manager.has_pending_flush() {
            return false;
        }
        self.sync_from_surface();
        self.session_manager.flush_if_due(now)
    }

    /// The page is about to close: write everything now
    pub fn before_unload(&self) -> UnloadReport {
        self.sync_from_surface();
        self.session_manager.prepare_unload()
    }

    fn sync_from_surface(&self) {
        let surface = self.surface.read();
        self.session_manager.sync_from_surface(&**surface);
    }

    fn with_surface<T>(&self, f: impl FnOnce(&mut dyn EditingSurface) -> T) -> T {
        let mut surface = self.surface.write();
        f(surface.as_mut())
    }

    fn surface_state(&self) -> (String, Selection) {
        let surface = self.surface.read();
        let viewport = surface.viewport();
        (
            surface.content(),
            Selection::new(viewport.cursor_start, viewport.cursor_end),
        )
    }

    fn apply_text_edit(&self, edit: TextEdit) -> Option<DocumentStatus> {
        let viewport = Viewport {
            cursor_start: edit.caret,
            cursor_end: edit.caret,
            ..self.surface_viewport()
        };
        self.input(&edit.text, viewport)
    }
}
