//! Tabpad Core
//!
//! Central coordination layer for the notepad. The host page renders tabs,
//! the status bar and the find panel; all document state lives here and is
//! driven through the command methods on [`Notepad`].

pub mod commands;
mod config;
mod editing;
mod error;
mod files;
mod notepad;
mod stats;
mod theme;

pub use config::Config;
pub use editing::{indent, unindent, TextEdit, INDENT};
pub use error::CoreError;
pub use files::{read_text_file, write_export, ExportedFile};
pub use notepad::{FindStatus, Notepad, StatusReport, WELCOME_NAME};
pub use stats::TextStats;
pub use theme::{Theme, THEME_KEY};

// Re-export core components
pub use tabpad_search::{
    ReplaceAllOutcome, ReplaceOneOutcome, SearchEngine, SearchError, SearchQuery, Selection,
};
pub use tabpad_session::{
    spawn_autosave, AutosaveHandle, CloseOutcome, PersistStatus, Preferences, SavedDocument,
    Session, SessionError, SessionManager, Snapshot, UnloadReport,
};
pub use tabpad_storage::{Database, KeyValueStore, MemoryStore, StorageError};
pub use tabpad_tabs::{
    BufferSurface, Document, DocumentStatus, EditingSurface, TabError, Viewport,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
