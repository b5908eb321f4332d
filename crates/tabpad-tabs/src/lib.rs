//! Tabpad Documents
//!
//! A document is one open tab: a name, an in-memory text buffer, the buffer
//! as of the last save or load, and where the caret and viewport were the
//! last time the tab was shown.

mod error;
mod state;
mod surface;
mod tab;

pub use error::TabError;
pub use state::DocumentStatus;
pub use surface::{BufferSurface, EditingSurface, Viewport};
pub use tab::Document;

pub type Result<T> = std::result::Result<T, TabError>;
