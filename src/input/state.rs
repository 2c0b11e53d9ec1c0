//! Interaction state machine - one explicit state for every pointer gesture.
//!
//! The gesture session (`PointerDownState`) only exists while a pointer is
//! pressed, so "dragging without a press" cannot be represented. Text
//! editing, multi-point drawing and pinching are orthogonal layers tracked
//! in `AppState` and the pinch map; `Editor::mode()` folds them in.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Panning                     (middle button, or main button while space is held)
//! Idle -> DraggingScrollBar           (main button on a scrollbar)
//! Idle -> Pointer{DragSelecting}      (selection tool on empty canvas)
//! Idle -> Pointer{DraggingSelection}  (press on an element or the selection's common box)
//! Idle -> Pointer{Transforming}       (press on a resize or rotation handle)
//! Idle -> Pointer{DrawingGeneric}     (rectangle / ellipse / diamond tool)
//! Idle -> Pointer{DrawingLinear}      (arrow / line tool)
//! Idle -> Pointer{DrawingFreehand}    (draw tool)
//! Idle -> Pointer{EditingLinearPoints} (press inside the point editor)
//!
//! Any -> Idle                         (pointer up / cancel, or abort)
//! ```

use crate::element::{Element, ElementId};
use crate::geometry::Point;
use crate::input::Modifiers;
use crate::transform::{AxisLock, TransformHandleType};
use crate::types::ArrowDirection;
use std::collections::HashMap;

/// Which scrollbars the press landed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollbarHit {
    pub horizontal: bool,
    pub vertical: bool,
}

impl ScrollbarHit {
    pub fn is_over_either(&self) -> bool {
        self.horizontal || self.vertical
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    pub handle_type: Option<TransformHandleType>,
    pub is_resizing: bool,
    /// Distance between the press and the grabbed handle's anchor
    pub offset: Point,
    pub arrow_direction: ArrowDirection,
    /// Center of the selection's common box at press
    pub center: Point,
}

impl Default for ResizeState {
    fn default() -> Self {
        Self {
            handle_type: None,
            is_resizing: false,
            offset: Point::ZERO,
            arrow_direction: ArrowDirection::Origin,
            center: Point::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitState {
    /// Element the press resolved to after the bbox tie-break
    pub element: Option<ElementId>,
    /// Every element under the press, bottom to top
    pub all_hit_elements: Vec<ElementId>,
    pub was_added_to_selection: bool,
    pub has_been_duplicated: bool,
    pub has_hit_common_bounding_box: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragState {
    pub has_occurred: bool,
    /// Press position relative to the selection's common top-left, set on the first move
    pub offset: Option<Point>,
    pub axis_lock: Option<AxisLock>,
}

/// Gesture session, created at pointer-down and dropped at pointer-up.
#[derive(Debug, Clone)]
pub struct PointerDownState {
    pub pointer_id: u32,
    /// Press position in scene coordinates
    pub origin: Point,
    pub origin_in_grid: Point,
    pub scrollbars: ScrollbarHit,
    /// Latest pointer position in scene coordinates
    pub last_coords: Point,
    /// Deep copies of every element at press
    pub original_elements: HashMap<ElementId, Element>,
    pub resize: ResizeState,
    pub hit: HitState,
    pub drag: DragState,
    pub modifiers: Modifiers,
}

impl PointerDownState {
    pub fn new(pointer_id: u32, origin: Point, grid_size: Option<f32>, modifiers: Modifiers) -> Self {
        Self {
            pointer_id,
            origin,
            origin_in_grid: crate::geometry::grid_point(origin.x, origin.y, grid_size),
            scrollbars: ScrollbarHit::default(),
            last_coords: origin,
            original_elements: HashMap::new(),
            resize: ResizeState::default(),
            hit: HitState::default(),
            drag: DragState::default(),
            modifiers,
        }
    }

    pub fn original(&self, id: &ElementId) -> Option<&Element> {
        self.original_elements.get(id)
    }

    /// Originals of `ids` in the given order, skipping unknown ids.
    pub fn originals_of<'a>(&'a self, ids: &[ElementId]) -> Vec<&'a Element> {
        ids.iter().filter_map(|id| self.original_elements.get(id)).collect()
    }
}

/// What the open session is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerMode {
    DragSelecting,
    DraggingSelection,
    Transforming,
    DrawingGeneric,
    DrawingLinear,
    DrawingFreehand,
    EditingLinearPoints,
}

#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    /// No pointer pressed
    #[default]
    Idle,

    /// Canvas panning
    Panning {
        pointer_id: u32,
        /// Viewport position of the last pan step
        last_position: Point,
    },

    /// Dragging a scrollbar thumb
    DraggingScrollBar {
        pointer_id: u32,
        hit: ScrollbarHit,
        /// Viewport position of the last scroll step
        last_position: Point,
    },

    /// A pointer gesture on the canvas
    Pointer {
        mode: PointerMode,
        session: Box<PointerDownState>,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }

    pub fn is_dragging_scroll_bar(&self) -> bool {
        matches!(self, Self::DraggingScrollBar { .. })
    }

    /// Any gesture that owns the pointer.
    pub fn is_active(&self) -> bool {
        !self.is_idle()
    }

    pub fn mode(&self) -> Option<PointerMode> {
        match self {
            Self::Pointer { mode, .. } => Some(*mode),
            _ => None,
        }
    }

    pub fn is_mode(&self, mode: PointerMode) -> bool {
        self.mode() == Some(mode)
    }

    pub fn session(&self) -> Option<&PointerDownState> {
        match self {
            Self::Pointer { session, .. } => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut PointerDownState> {
        match self {
            Self::Pointer { session, .. } => Some(session),
            _ => None,
        }
    }

    pub fn pointer_id(&self) -> Option<u32> {
        match self {
            Self::Idle => None,
            Self::Panning { pointer_id, .. } | Self::DraggingScrollBar { pointer_id, .. } => Some(*pointer_id),
            Self::Pointer { session, .. } => Some(session.pointer_id),
        }
    }

    pub fn start_panning(&mut self, pointer_id: u32, position: Point) {
        *self = Self::Panning {
            pointer_id,
            last_position: position,
        };
    }

    pub fn start_scroll_bar_drag(&mut self, pointer_id: u32, hit: ScrollbarHit, position: Point) {
        *self = Self::DraggingScrollBar {
            pointer_id,
            hit,
            last_position: position,
        };
    }

    pub fn start_pointer(&mut self, mode: PointerMode, session: PointerDownState) {
        *self = Self::Pointer {
            mode,
            session: Box::new(session),
        };
    }

    /// Re-classify an open session. No-op outside `Pointer`.
    pub fn set_mode(&mut self, next: PointerMode) {
        if let Self::Pointer { mode, .. } = self {
            *mode = next;
        }
    }

    /// Leave whatever gesture is open and hand back the session, if any.
    pub fn finish(&mut self) -> Option<(PointerMode, PointerDownState)> {
        match std::mem::take(self) {
            Self::Pointer { mode, session } => Some((mode, *session)),
            _ => None,
        }
    }

    /// Drop the current state without running any pointer-up logic.
    pub fn abort(&mut self) {
        if !self.is_idle() {
            tracing::debug!(state = ?self.mode(), "interaction aborted");
        }
        *self = Self::Idle;
    }
}
