//! Viewport <-> scene coordinate conversion.
//!
//! ```text
//! scene = (client - zoom.translation - offset) / zoom - scroll
//! ```

use crate::app_state::AppState;
use crate::geometry::Point;

/// Convert a viewport (client) position to scene coordinates.
#[inline]
pub fn viewport_to_scene(client: Point, state: &AppState) -> Point {
    let zoom = state.zoom.value.max(f32::EPSILON);
    Point::new(
        (client.x - state.zoom.translation.x - state.offset_left) / zoom - state.scroll_x,
        (client.y - state.zoom.translation.y - state.offset_top) / zoom - state.scroll_y,
    )
}

/// Inverse of [`viewport_to_scene`].
#[inline]
pub fn scene_to_viewport(scene: Point, state: &AppState) -> Point {
    let zoom = state.zoom.value;
    Point::new(
        (scene.x + state.scroll_x) * zoom + state.zoom.translation.x + state.offset_left,
        (scene.y + state.scroll_y) * zoom + state.zoom.translation.y + state.offset_top,
    )
}

/// Convert a viewport delta into a scene delta.
#[inline]
pub fn delta_viewport_to_scene(delta: Point, zoom: f32) -> Point {
    let zoom = zoom.max(f32::EPSILON);
    Point::new(delta.x / zoom, delta.y / zoom)
}

/// Scroll offsets are kept on whole scene units.
#[inline]
pub fn normalize_scroll(value: f32) -> f32 {
    value.floor()
}
