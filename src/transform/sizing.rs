//! Sizing of elements while they are being drawn.

use crate::constants::SHIFT_LOCKING_ANGLE;
use crate::geometry::Point;
use crate::types::ElementType;

/// Shift-constrained size: lines lock to 15° steps, shapes become square.
pub fn perfect_element_size(element_type: ElementType, width: f32, height: f32) -> (f32, f32) {
    let (abs_w, abs_h) = (width.abs(), height.abs());
    if element_type.is_linear() {
        if abs_w <= f32::EPSILON && abs_h <= f32::EPSILON {
            return (width, height);
        }
        let locked = ((abs_h.atan2(abs_w)) / SHIFT_LOCKING_ANGLE).round() * SHIFT_LOCKING_ANGLE;
        if locked.abs() <= f32::EPSILON {
            (width, 0.0)
        } else if (locked - std::f32::consts::FRAC_PI_2).abs() <= 1e-4 {
            (0.0, height)
        } else {
            let sign = if height < 0.0 { -1.0 } else { 1.0 };
            (width, abs_w * locked.tan() * sign)
        }
    } else if element_type != ElementType::Selection {
        let sign = if height < 0.0 { -1.0 } else { 1.0 };
        (width, abs_w * sign)
    } else {
        (width, height)
    }
}

/// Box of a generic element dragged out from `origin` to `pointer`.
///
/// `keep_aspect` squares the box (except for the marquee), `centered` grows
/// it about `origin`. Returns `(x, y, width, height)`, or `None` while either
/// side is zero.
pub fn drag_new_element(
    element_type: ElementType,
    origin: Point,
    pointer: Point,
    keep_aspect: bool,
    centered: bool,
) -> Option<(f32, f32, f32, f32)> {
    let (mut width, mut height) = ((pointer.x - origin.x).abs(), (pointer.y - origin.y).abs());
    if keep_aspect && element_type != ElementType::Selection {
        let (w, h) = perfect_element_size(element_type, width, height);
        width = w.abs();
        height = h.abs();
    }
    let mut x = if pointer.x < origin.x { origin.x - width } else { origin.x };
    let mut y = if pointer.y < origin.y { origin.y - height } else { origin.y };
    if centered {
        width *= 2.0;
        height *= 2.0;
        x = origin.x - width / 2.0;
        y = origin.y - height / 2.0;
    }
    (width != 0.0 && height != 0.0).then_some((x, y, width, height))
}
