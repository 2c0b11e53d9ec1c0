//! Zoom normalization and anchored zoom steps.

use crate::app_state::Zoom;
use crate::constants::{MAX_ZOOM, MIN_ZOOM};
use crate::geometry::Point;

/// Round to two decimals and clamp to the supported range.
pub fn normalize_zoom(value: f32) -> f32 {
    if !value.is_finite() {
        return 1.0;
    }
    let rounded = (value * 100.0).round() / 100.0;
    rounded.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Zoom to `value`, keeping the viewport point `anchor` over the same scene point.
///
/// `canvas_offset` is the canvas origin in client coordinates.
pub fn get_new_zoom(value: f32, prev: Zoom, canvas_offset: Point, anchor: Point) -> Zoom {
    let ratio = value / prev.value.max(f32::EPSILON);
    let ax = anchor.x - canvas_offset.x;
    let ay = anchor.y - canvas_offset.y;
    Zoom {
        value,
        translation: Point::new(
            ax - (ax - prev.translation.x) * ratio,
            ay - (ay - prev.translation.y) * ratio,
        ),
    }
}
