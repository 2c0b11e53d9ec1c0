//! Error types for the editor core
//!
//! Only boundary operations fail: parsing clipboard/drop/document payloads,
//! file IO and the settings watcher. Geometry and interaction handlers are
//! total and never return these.

use crate::element::ElementId;
use thiserror::Error;

/// Errors that can occur at the editor's outer boundary
#[derive(Error, Debug)]
pub enum EditorError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Clipboard contents looked like editor data but could not be read
    #[error("Couldn't paste: {0}")]
    MalformedClipboard(String),

    /// A dropped or loaded file is not a valid document
    #[error("Couldn't load invalid file: {0}")]
    InvalidDocument(String),

    /// An operation referenced an element the scene doesn't have
    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),

    /// File watcher failure
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Generic error message
    #[error("{0}")]
    Other(String),
}

/// Result type alias for editor boundary operations
pub type EditorResult<T> = Result<T, EditorError>;

impl From<String> for EditorError {
    fn from(s: String) -> Self {
        EditorError::Other(s)
    }
}

impl From<&str> for EditorError {
    fn from(s: &str) -> Self {
        EditorError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for EditorError {
    fn from(e: anyhow::Error) -> Self {
        EditorError::Other(format!("{e:#}"))
    }
}
