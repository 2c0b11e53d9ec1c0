//! Transform engine - drag, resize, rotate and new-element sizing.
//!
//! The functions in the submodules are pure: they take elements as they
//! were at pointer-down and return new bodies. [`transform_elements`] is
//! the one entry point that writes a resize or rotation into the scene.
//!
//! ## Modules
//!
//! - `handles` - handle layout and hit testing
//! - `resize` - single, multi and two-point-line resizing
//! - `rotate` - single and multi rotation
//! - `drag` - selection translation and axis lock
//! - `sizing` - shift-constrained and centered sizing of new elements

mod drag;
mod handles;
mod resize;
mod rotate;
mod sizing;

pub use drag::{drag_offset, drag_selected_elements, AxisLock};
pub use handles::{
    get_transform_handle_at, get_transform_handle_from_coords, transform_handles,
    transform_handles_for_bounds, TransformHandle, TransformHandleType,
};
pub use resize::{
    resize_arrow_direction, resize_multiple_elements, resize_offset, resize_single_element,
    resize_two_point_linear,
};
pub use rotate::{rotate_multiple_elements, rotate_single_element};
pub use sizing::{drag_new_element, perfect_element_size};

use crate::binding::update_bound_elements;
use crate::element::{Element, ElementData, ElementId};
use crate::geometry::Point;
use crate::input::{Modifiers, PointerDownState};
use crate::perf::profile_function;
use crate::scene::Scene;
use std::collections::HashSet;

/// Copy geometry from `from` into `to`, keeping relation fields (bindings,
/// bound elements, groups) as they are now.
pub fn apply_geometry(to: &mut ElementData, from: ElementData) {
    to.x = from.x;
    to.y = from.y;
    to.width = from.width;
    to.height = from.height;
    to.angle = from.angle;
    if let (Some(dst), Some(src)) = (to.linear_mut(), from.linear()) {
        dst.points = src.points.clone();
        dst.last_committed_point = src.last_committed_point;
    }
    if let (Some(dst), Some(src)) = (to.text_mut(), from.text()) {
        dst.font_size = src.font_size;
        dst.baseline = src.baseline;
    }
}

fn is_two_point_linear(el: &Element) -> bool {
    el.linear().is_some_and(|l| l.points.len() == 2)
}

/// Apply the resize or rotation of the active gesture. Shift keeps the
/// aspect (or snaps angles), alt resizes from the center.
///
/// `pointer` is already corrected by the session's resize offset and snapped
/// to the grid. Returns whether anything changed.
pub fn transform_elements(
    scene: &mut Scene,
    session: &PointerDownState,
    selected: &[ElementId],
    modifiers: &Modifiers,
    pointer: Point,
) -> bool {
    profile_function!();
    let Some(handle) = session.resize.handle_type else {
        return false;
    };
    let originals: Vec<&Element> = selected
        .iter()
        .filter_map(|id| session.original_elements.get(id))
        .collect();
    if originals.is_empty() {
        return false;
    }

    let updates: Vec<(ElementId, ElementData)> = match (handle, originals.as_slice()) {
        (TransformHandleType::Rotation, [single]) => {
            vec![(single.id().clone(), rotate_single_element(single, pointer, modifiers.shift))]
        }
        (TransformHandleType::Rotation, many) => {
            rotate_multiple_elements(many, session.resize.center, pointer, modifiers.shift)
        }
        (h, [single]) if h.is_corner() && is_two_point_linear(single) => {
            resize_two_point_linear(single, session.resize.arrow_direction, pointer, modifiers.shift)
                .map(|d| (single.id().clone(), d))
                .into_iter()
                .collect()
        }
        (h, [single]) => resize_single_element(single, h, pointer, modifiers.shift, modifiers.alt)
            .map(|d| (single.id().clone(), d))
            .into_iter()
            .collect(),
        (h, many) => resize_multiple_elements(many, h, pointer, modifiers.alt).unwrap_or_default(),
    };
    if updates.is_empty() {
        return false;
    }

    tracing::trace!(?handle, count = updates.len(), "transform applied");
    for (id, data) in updates {
        scene.mutate_element(&id, |d| apply_geometry(d, data));
    }
    let moved: HashSet<ElementId> = selected.iter().cloned().collect();
    for id in selected {
        update_bound_elements(scene, id, &moved);
    }
    true
}
