//! Tabpad Storage Layer
//!
//! Local key-value persistence for the notepad session and preferences.
//! Every value is a single string entry; writes are last-writer-wins.

mod database;
mod error;
mod memory;
mod migrations;

pub use database::Database;
pub use error::StorageError;
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StorageError>;

/// A string-valued key-value store.
///
/// Implementations must be safe to share between the session store and the
/// autosave task.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}
