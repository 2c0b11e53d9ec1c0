//! Application module - the editor that owns the scene, history and interaction state.
//!
//! This module is organized into several submodules:
//! - `state` - The Editor struct definition and sub-structs
//! - `lifecycle` - Construction, settings application and hot reload
//! - `dispatch` - Event entry points, batching and change listeners
//! - `api` - Imperative host API and shared lookups
//! - `actions` - Finalize, undo/redo, duplicate, group and delete
//! - `text` - Text element editing
//! - `clipboard` - Copy/paste, drops and document loading
//! - `remote` - Collaboration inbox and reconciliation

mod actions;
mod api;
mod clipboard;
mod dispatch;
mod lifecycle;
mod remote;
mod state;
mod text;

pub use api::SceneUpdate;
pub use remote::{reconcile_elements, RemoteUpdate, RemoteUpdateSender};
pub use state::{ChangeListener, Editor, EditorMode, ListenerId};

// Re-export sub-structs for use in other modules
pub use state::{KeyState, SettingsState, SystemState};
