//! Platform-neutral input events.
//!
//! Hosts translate their windowing toolkit's events into these structs and
//! feed them to `Editor::dispatch`. Positions are viewport (client) pixels.

use crate::geometry::Point;

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self { shift: true, ..Self::NONE }
    }

    pub fn alt() -> Self {
        Self { alt: true, ..Self::NONE }
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::NONE }
    }

    /// Ctrl on Linux/Windows, Cmd on macOS. Either counts.
    #[inline]
    pub fn ctrl_or_cmd(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Button {
    #[default]
    Main,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub position: Point,
    pub button: Button,
    pub pointer_type: PointerType,
    pub modifiers: Modifiers,
    /// Buttons held while moving (0 when hovering)
    pub buttons_down: u8,
}

impl PointerEvent {
    /// Main-button mouse event at `(x, y)` with no modifiers.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            pointer_id: 1,
            position: Point::new(x, y),
            button: Button::Main,
            pointer_type: PointerType::Mouse,
            modifiers: Modifiers::NONE,
            buttons_down: 0,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_button(mut self, button: Button) -> Self {
        self.button = button;
        self
    }

    pub fn with_pointer_id(mut self, pointer_id: u32) -> Self {
        self.pointer_id = pointer_id;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub position: Point,
    pub delta_x: f32,
    pub delta_y: f32,
    pub modifiers: Modifiers,
}

impl WheelEvent {
    /// Trackpad pinch arrives as ctrl+wheel; mouse zoom is ctrl/cmd+wheel.
    pub fn is_zoom_intent(&self) -> bool {
        self.modifiers.ctrl_or_cmd()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable key, lowercase
    Char(char),
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Delete,
    Backspace,
    Space,
    Other,
}

impl Key {
    pub fn is_arrow(self) -> bool {
        matches!(self, Key::ArrowLeft | Key::ArrowRight | Key::ArrowUp | Key::ArrowDown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// What a drag-and-drop carried onto the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum DropPayload {
    /// A saved document (replaces the scene)
    Document(String),
    /// A library item (pasted at the drop position)
    Library { json: String, position: Point },
}

/// Every input the editor accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    PointerCancel(PointerEvent),
    DoubleClick(PointerEvent),
    Wheel(WheelEvent),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    /// Window lost focus
    Blur,
    /// Clipboard paste with the cursor's viewport position
    Paste { payload: String, position: Point },
    Drop(DropPayload),
}

impl EditorEvent {
    /// Short name for logging and timing.
    pub fn kind(&self) -> &'static str {
        match self {
            EditorEvent::PointerDown(_) => "pointer_down",
            EditorEvent::PointerMove(_) => "pointer_move",
            EditorEvent::PointerUp(_) => "pointer_up",
            EditorEvent::PointerCancel(_) => "pointer_cancel",
            EditorEvent::DoubleClick(_) => "double_click",
            EditorEvent::Wheel(_) => "wheel",
            EditorEvent::KeyDown(_) => "key_down",
            EditorEvent::KeyUp(_) => "key_up",
            EditorEvent::Blur => "blur",
            EditorEvent::Paste { .. } => "paste",
            EditorEvent::Drop(_) => "drop",
        }
    }

    /// Screen out non-finite coordinates before any handler sees them.
    ///
    /// Presses, moves, double clicks and wheel events at a non-finite position
    /// are dropped. Releases and cancels fall back to `last_cursor` so an open
    /// gesture still ends. Non-finite wheel deltas count as zero.
    pub fn sanitized(self, last_cursor: Point) -> Option<EditorEvent> {
        let at_cursor = |position: Point| if position.is_finite() { position } else { last_cursor };
        match self {
            EditorEvent::PointerDown(e) | EditorEvent::PointerMove(e) | EditorEvent::DoubleClick(e)
                if !e.position.is_finite() =>
            {
                None
            }
            EditorEvent::PointerUp(mut e) => {
                e.position = at_cursor(e.position);
                Some(EditorEvent::PointerUp(e))
            }
            EditorEvent::PointerCancel(mut e) => {
                e.position = at_cursor(e.position);
                Some(EditorEvent::PointerCancel(e))
            }
            EditorEvent::Wheel(e) if !e.position.is_finite() => None,
            EditorEvent::Wheel(mut e) => {
                let finite_or_zero = |v: f32| if v.is_finite() { v } else { 0.0 };
                e.delta_x = finite_or_zero(e.delta_x);
                e.delta_y = finite_or_zero(e.delta_y);
                Some(EditorEvent::Wheel(e))
            }
            EditorEvent::Paste { payload, position } => Some(EditorEvent::Paste {
                payload,
                position: at_cursor(position),
            }),
            EditorEvent::Drop(DropPayload::Library { json, position }) => Some(EditorEvent::Drop(DropPayload::Library {
                json,
                position: at_cursor(position),
            })),
            other => Some(other),
        }
    }
}
