//! Notepad configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the local storage database
    pub database_path: PathBuf,
    /// Where saved documents are written
    pub export_dir: PathBuf,
    /// Quiet period before an autosave, in milliseconds
    pub autosave_interval_ms: u64,
    /// Font size for a fresh session
    pub default_font_size: u32,
    /// Open the welcome document when nothing can be restored
    pub welcome_document: bool,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        let export_dir = dirs::download_dir().unwrap_or_else(|| data_dir.join("Documents"));

        Self {
            database_path: data_dir.join("tabpad.db"),
            export_dir,
            autosave_interval_ms: 1000,
            default_font_size: 13,
            welcome_document: true,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Tabpad"))
            .unwrap_or_else(|| PathBuf::from(".tabpad"))
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_millis(self.autosave_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
