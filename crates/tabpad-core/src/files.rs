//! File import and export

use serde::Serialize;
use std::path::{Path, PathBuf};

use tabpad_session::SavedDocument;

use crate::Result;

/// A saved document ready to be written out as UTF-8 text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFile {
    pub file_name: String,
    pub content: String,
}

impl From<SavedDocument> for ExportedFile {
    fn from(saved: SavedDocument) -> Self {
        Self {
            file_name: saved.file_name,
            content: saved.content,
        }
    }
}

/// Read a file as text, returning `(name, content)`.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_text_file(path: &Path) -> Result<(String, String)> {
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok((name, content))
}

/// Write an exported file into `dir`, returning the path written
pub fn write_export(dir: &Path, file: &ExportedFile) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(sanitize_file_name(&file.file_name));
    std::fs::write(&path, file.content.as_bytes())?;

    tracing::info!(path = %path.display(), bytes = file.content.len(), "Exported document");

    Ok(path)
}

fn sanitize_file_name(file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document.txt")
        .trim();

    if name.is_empty() {
        "document.txt".to_string()
    } else {
        name.to_string()
    }
}
