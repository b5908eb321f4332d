//! Tabpad Session Management
//!
//! - A session is the ordered list of open documents, the active document and
//!   the editor preferences
//! - Every mutation schedules a debounced write of the whole session to local
//!   storage; a new mutation inside the quiet interval pushes the write back
//! - On startup the last written session is restored, or the caller falls
//!   back to a fresh one
//! - The session never stays empty: closing the last document opens a blank one

mod autosave;
mod debounce;
mod error;
mod manager;
mod preferences;
mod session;
mod snapshot;

pub use autosave::{spawn_autosave, AutosaveHandle};
pub use debounce::Debouncer;
pub use error::SessionError;
pub use manager::{
    PersistStatus, SessionManager, UnloadReport, DEFAULT_AUTOSAVE_INTERVAL, SNAPSHOT_KEY,
};
pub use preferences::{Preferences, DEFAULT_FONT_SIZE, FONT_SIZE_MAX, FONT_SIZE_MIN};
pub use session::{CloseOutcome, SavedDocument, Session};
pub use snapshot::{Snapshot, SnapshotTab};

pub type Result<T> = std::result::Result<T, SessionError>;
