//! Pointer, wheel and keyboard handling for the canvas.
//!
//! This module implements the interaction engine: how a press becomes a
//! selection, a drag, a transform or a new element, and how that gesture
//! is finalized on release.
//!
//! ## Architecture
//!
//! The input system uses an explicit state machine (`InteractionState`) to
//! track the current gesture. The per-gesture session (`PointerDownState`)
//! lives inside the state, so it is created at pointer-down and dropped at
//! pointer-up, with `abort` reachable from every state.
//!
//! ## Modules
//!
//! - `events` - platform-neutral event structs
//! - `state` - interaction state machine and gesture session
//! - `coords` - viewport/scene conversion
//! - `zoom` - zoom normalization and anchored zoom
//! - `pinch` - two-pointer pinch tracking
//! - `scrollbars` - scrollbar geometry and hit testing
//! - `pointer_down` - press handling (selection, handles, new elements)
//! - `pointer_move` - session moves and hover
//! - `pointer_up` - gesture finalization
//! - `linear_editor` - point editing on lines and arrows
//! - `wheel` - scroll and zoom
//! - `keyboard` - shortcuts, nudging and modifier changes

mod coords;
mod events;
mod keyboard;
mod linear_editor;
mod pinch;
mod pointer_down;
mod pointer_move;
mod pointer_up;
mod scrollbars;
mod state;
mod wheel;
mod zoom;

pub use coords::{delta_viewport_to_scene, normalize_scroll, scene_to_viewport, viewport_to_scene};
pub use events::{
    Button, DropPayload, EditorEvent, Key, KeyEvent, Modifiers, PointerEvent, PointerType, WheelEvent,
};
pub use linear_editor::{create_point_at, point_index_under_cursor};
pub use pinch::{PinchGesture, PinchStep};
pub use scrollbars::{get_scroll_bars, is_over_scroll_bars, ScrollBars};
pub use state::{
    DragState, HitState, InteractionState, PointerDownState, PointerMode, ResizeState, ScrollbarHit,
};
pub use zoom::{get_new_zoom, normalize_zoom};
