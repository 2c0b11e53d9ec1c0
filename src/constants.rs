//! Editor-wide constants.
//!
//! Centralizes thresholds and defaults that the interaction engine, the
//! transform engine and the binding resolver agree on.

// ============================================================================
// Pointer Thresholds
// ============================================================================

/// Distance (scene units) an arrow/line press must travel before it counts as a drag.
pub const DRAGGING_THRESHOLD: f32 = 10.0;

/// Radius of the commit zone around the last placed point of a multi-point line.
pub const LINE_CONFIRM_THRESHOLD: f32 = 10.0;

/// Slack (viewport px) around a selection's common box that still counts as a hit.
pub const COMMON_BOUNDS_HIT_THRESHOLD: f32 = 10.0;

/// Padding (viewport px) of an element's bounding box for bbox hit tests.
pub const BOUNDING_BOX_HIT_PADDING: f32 = 10.0;

/// Distance (viewport px) from an outline that still hits the painted shape.
pub const SHAPE_HIT_TOLERANCE: f32 = 4.0;

/// Radius (viewport px) around a linear element's point for the point editor.
pub const POINT_HIT_RADIUS: f32 = 10.0;

/// Below this span (scene units) in both axes a new element is discarded.
pub const INVISIBLY_SMALL_ELEMENT_SIZE: f32 = 1.0;

/// Distance from a container center within which new text snaps to it.
pub const TEXT_TO_CENTER_SNAP_THRESHOLD: f32 = 30.0;

// ============================================================================
// Transform Handles
// ============================================================================

/// Side length (viewport px) of a resize handle.
pub const TRANSFORM_HANDLE_SIZE: f32 = 8.0;

/// Gap (viewport px) between an element's box and its handles.
pub const TRANSFORM_HANDLE_MARGIN: f32 = 4.0;

/// Distance (viewport px) of the rotation handle above the top edge.
pub const ROTATION_HANDLE_GAP: f32 = 16.0;

/// Angular step used when rotation or line angles are snapped (15°).
pub const SHIFT_LOCKING_ANGLE: f32 = std::f32::consts::PI / 12.0;

// ============================================================================
// Binding
// ============================================================================

/// How far (scene units) outside a shape a pointer may be to suggest or create a binding.
pub const BINDING_HIT_GAP: f32 = 15.0;

/// Gap kept between a bound endpoint and the target's outline.
pub const BINDING_GAP: f32 = 4.0;

// ============================================================================
// Viewport
// ============================================================================

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f32 = 0.1;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f32 = 10.0;

/// Default cap on a single wheel zoom step.
pub const WHEEL_ZOOM_MAX_STEP: f32 = 10.0;

/// Trailing-edge delay before the zoom render cache is re-enabled.
pub const CACHE_IGNORE_ZOOM_RESET_MS: u64 = 300;

/// Window in which a second touch tap counts as a double click.
pub const TAP_TWICE_TIMEOUT_MS: u64 = 300;

/// Scrollbar thickness (viewport px).
pub const SCROLLBAR_WIDTH: f32 = 6.0;

/// Scrollbar distance from the viewport edge (viewport px).
pub const SCROLLBAR_MARGIN: f32 = 4.0;

// ============================================================================
// Keyboard
// ============================================================================

/// Arrow key nudge distance.
pub const ELEMENT_TRANSLATE_AMOUNT: f32 = 1.0;

/// Arrow key nudge distance with shift held.
pub const ELEMENT_SHIFT_TRANSLATE_AMOUNT: f32 = 5.0;

// ============================================================================
// Defaults
// ============================================================================

/// Grid size applied when the grid is toggled on.
pub const GRID_SIZE: f32 = 20.0;

/// Default text size.
pub const DEFAULT_FONT_SIZE: f32 = 20.0;

/// Line height as a multiple of the font size.
pub const TEXT_LINE_HEIGHT: f32 = 1.25;

/// Tolerance factor for freehand simplification, divided by zoom.
pub const FREEDRAW_SIMPLIFY_TOLERANCE: f32 = 0.7;

/// Per-event handling budget before a slow-event warning is logged.
pub const EVENT_BUDGET_MS: f64 = 16.0;

/// Clipboard payload discriminator.
pub const CLIPBOARD_TYPE: &str = "inkboard/clipboard";

/// Document payload discriminator.
pub const DOCUMENT_TYPE: &str = "inkboard";

/// Library payload discriminator.
pub const LIBRARY_TYPE: &str = "inkboard/library";

/// Document schema version written on save.
pub const DOCUMENT_VERSION: u32 = 2;
