//! Rotation around an element's own center or a selection's common center.

use crate::constants::SHIFT_LOCKING_ANGLE;
use crate::element::{element_center, Element, ElementData, ElementId};
use crate::geometry::{normalize_angle, Point};

/// Angle of the pointer around `center`, with 0 pointing up.
fn pointer_angle(center: Point, pointer: Point, snap: bool) -> f32 {
    let mut angle = 5.0 * std::f32::consts::PI / 2.0 + (pointer.y - center.y).atan2(pointer.x - center.x);
    if snap {
        angle += SHIFT_LOCKING_ANGLE / 2.0;
        angle -= angle % SHIFT_LOCKING_ANGLE;
    }
    normalize_angle(angle)
}

pub fn rotate_single_element(original: &Element, pointer: Point, snap: bool) -> ElementData {
    let mut data = original.data().clone();
    data.angle = pointer_angle(element_center(original), pointer, snap);
    data
}

/// Each element's center orbits `center`; each element turns by the same angle.
pub fn rotate_multiple_elements(
    originals: &[&Element],
    center: Point,
    pointer: Point,
    snap: bool,
) -> Vec<(ElementId, ElementData)> {
    let turn = pointer_angle(center, pointer, snap);
    originals
        .iter()
        .map(|el| {
            let c = element_center(el);
            let moved = c.rotate_around(center, turn);
            let mut data = el.data().clone();
            data.x += moved.x - c.x;
            data.y += moved.y - c.y;
            data.angle = normalize_angle(turn + el.angle);
            (el.id().clone(), data)
        })
        .collect()
}
