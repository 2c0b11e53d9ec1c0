//! Inkboard - the headless interaction core of an infinite-canvas diagram editor.
//!
//! The host owns the window, the renderer and the text field. It feeds
//! platform events to [`Editor::dispatch`] and redraws from the scene and
//! app state the editor hands back through change listeners.
//!
//! ## Layers
//!
//! - `element`, `geometry`, `types` - the element record and plane math
//! - `scene` - ordered element store with change notifications
//! - `history` - snapshot undo/redo
//! - `binding` - arrow-to-shape attachment
//! - `transform` - drag, resize and rotate math
//! - `input` - the pointer interaction state machine
//! - `app` - the `Editor` tying it all together

pub mod app;
pub mod app_state;
pub mod binding;
pub mod constants;
pub mod debounce;
pub mod document;
pub mod element;
pub mod error;
pub mod geometry;
pub mod groups;
pub mod history;
pub mod input;
pub mod logging;
pub mod perf;
pub mod scene;
pub mod settings;
pub mod settings_watcher;
pub mod spatial_index;
pub mod transform;
pub mod types;

pub use app::{Editor, EditorMode, RemoteUpdate, RemoteUpdateSender, SceneUpdate};
pub use app_state::AppState;
pub use element::{Element, ElementId};
pub use error::{EditorError, EditorResult};
pub use input::{EditorEvent, KeyEvent, PointerEvent, WheelEvent};
