//! Document, clipboard and library payloads.
//!
//! All three are JSON objects with a `type` discriminator. Documents carry
//! the element list plus a small viewport subset of the app state; gesture
//! state and tombstones are never written.

use crate::app_state::AppState;
use crate::constants::{CLIPBOARD_TYPE, DOCUMENT_TYPE, DOCUMENT_VERSION, LIBRARY_TYPE};
use crate::element::Element;
use crate::error::{EditorError, EditorResult};
use crate::types::ElementType;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Persisted slice of the app state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentAppState {
    pub grid_size: Option<f32>,
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub zoom: Option<f32>,
}

impl DocumentAppState {
    pub fn from_app_state(state: &AppState) -> Self {
        Self {
            grid_size: state.grid_size,
            scroll_x: state.scroll_x,
            scroll_y: state.scroll_y,
            zoom: Some(state.zoom.value),
        }
    }

    pub fn apply(&self, state: &mut AppState) {
        state.grid_size = self.grid_size;
        state.scroll_x = self.scroll_x;
        state.scroll_y = self.scroll_y;
        if let Some(z) = self.zoom {
            state.zoom.value = crate::input::normalize_zoom(z);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    #[serde(default)]
    pub source: Option<String>,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub app_state: DocumentAppState,
}

/// Tombstones and marquee elements never leave the editor.
fn exportable(elements: impl IntoIterator<Item = Element>) -> Vec<Element> {
    elements
        .into_iter()
        .filter(|el| !el.is_deleted && el.element_type() != ElementType::Selection)
        .collect()
}

pub fn serialize_document(elements: &[Element], state: &AppState) -> EditorResult<String> {
    let doc = Document {
        kind: DOCUMENT_TYPE.to_owned(),
        version: DOCUMENT_VERSION,
        source: Some(concat!("inkboard/", env!("CARGO_PKG_VERSION")).to_owned()),
        elements: exportable(elements.iter().cloned()),
        app_state: DocumentAppState::from_app_state(state),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse and clean a document: wrong `type` is rejected, tombstones and
/// selection elements are dropped.
pub fn parse_document(json: &str) -> EditorResult<Document> {
    let mut doc: Document =
        serde_json::from_str(json).map_err(|e| EditorError::InvalidDocument(e.to_string()))?;
    if doc.kind != DOCUMENT_TYPE {
        return Err(EditorError::InvalidDocument(format!("unexpected type `{}`", doc.kind)));
    }
    doc.elements = exportable(doc.elements);
    Ok(doc)
}

/// Atomic save through a temp file in the target directory.
pub fn save_to_path(path: &Path, elements: &[Element], state: &AppState) -> EditorResult<()> {
    let json = serialize_document(elements, state)?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.persist(path).map_err(|e| EditorError::Io(e.error))?;
    tracing::info!(path = %path.display(), elements = elements.len(), "Document saved");
    Ok(())
}

pub fn load_from_path(path: &Path) -> EditorResult<Document> {
    let json = std::fs::read_to_string(path)?;
    let doc = parse_document(&json)?;
    tracing::info!(path = %path.display(), elements = doc.elements.len(), "Document loaded");
    Ok(doc)
}

// ============================================================================
// Clipboard
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct ClipboardPayload {
    #[serde(rename = "type")]
    kind: String,
    elements: Vec<Element>,
}

/// What a paste carried.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipboardContent {
    Elements(Vec<Element>),
    Text(String),
}

pub fn serialize_clipboard<'a>(elements: impl IntoIterator<Item = &'a Element>) -> EditorResult<String> {
    let payload = ClipboardPayload {
        kind: CLIPBOARD_TYPE.to_owned(),
        elements: exportable(elements.into_iter().cloned()),
    };
    Ok(serde_json::to_string(&payload)?)
}

/// Classify a paste. Text that is not a JSON object is plain text; a JSON
/// object must be a well-formed clipboard payload.
pub fn parse_clipboard(payload: &str) -> EditorResult<ClipboardContent> {
    let trimmed = payload.trim_start();
    if !trimmed.starts_with('{') {
        return Ok(ClipboardContent::Text(payload.to_owned()));
    }
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| EditorError::MalformedClipboard(e.to_string()))?;
    match value.get("type").and_then(|t| t.as_str()) {
        Some(CLIPBOARD_TYPE) => {
            let clip: ClipboardPayload = serde_json::from_value(value)
                .map_err(|e| EditorError::MalformedClipboard(e.to_string()))?;
            Ok(ClipboardContent::Elements(exportable(clip.elements)))
        }
        _ => Ok(ClipboardContent::Text(payload.to_owned())),
    }
}

// ============================================================================
// Library
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct LibraryPayload {
    #[serde(rename = "type")]
    kind: String,
    /// Each item is a group of elements placed together
    library: Vec<Vec<Element>>,
}

/// Elements of every item in a library payload, flattened.
pub fn parse_library(json: &str) -> EditorResult<Vec<Element>> {
    let lib: LibraryPayload =
        serde_json::from_str(json).map_err(|e| EditorError::InvalidDocument(e.to_string()))?;
    if lib.kind != LIBRARY_TYPE {
        return Err(EditorError::InvalidDocument(format!("unexpected type `{}`", lib.kind)));
    }
    Ok(exportable(lib.library.into_iter().flatten()))
}

pub fn serialize_library(items: &[Vec<Element>]) -> EditorResult<String> {
    let lib = LibraryPayload {
        kind: LIBRARY_TYPE.to_owned(),
        library: items.to_vec(),
    };
    Ok(serde_json::to_string(&lib)?)
}
