//! Resizing of single elements, multi-selections and two-point lines.
//!
//! Every function takes the element as it was at pointer-down and returns
//! the body it should have now, so repeated moves never accumulate error.

use super::handles::TransformHandleType;
use super::sizing::perfect_element_size;
use crate::element::{common_bounds, element_abs_coords, Element, ElementData, ElementId};
use crate::geometry::{Bounds, Point};
use crate::types::{ArrowDirection, ElementType};

/// Offset between the pointer and the grabbed edge or corner at pointer-down.
///
/// Subtracting it from later pointer positions keeps the edge from jumping
/// to the pointer.
pub fn resize_offset(handle: TransformHandleType, selected: &[&Element], origin: Point) -> Point {
    let (bounds, angle) = match selected {
        [single] => (element_abs_coords(single), single.angle),
        many => match common_bounds(many.iter().copied()) {
            Some(b) => (b, 0.0),
            None => return Point::ZERO,
        },
    };
    let center = bounds.center();
    let p = origin.rotate_around(center, -angle);
    let Bounds { min_x: x1, min_y: y1, max_x: x2, max_y: y2 } = bounds;
    let local = match handle {
        TransformHandleType::N => Point::new(p.x - center.x, p.y - y1),
        TransformHandleType::S => Point::new(p.x - center.x, p.y - y2),
        TransformHandleType::W => Point::new(p.x - x1, p.y - center.y),
        TransformHandleType::E => Point::new(p.x - x2, p.y - center.y),
        TransformHandleType::NW => Point::new(p.x - x1, p.y - y1),
        TransformHandleType::NE => Point::new(p.x - x2, p.y - y1),
        TransformHandleType::SW => Point::new(p.x - x1, p.y - y2),
        TransformHandleType::SE => Point::new(p.x - x2, p.y - y2),
        TransformHandleType::Rotation => return Point::ZERO,
    };
    local.rotate_around(Point::ZERO, angle)
}

fn ratio(delta: f32, extent: f32) -> f32 {
    if extent.abs() <= f32::EPSILON { 1.0 } else { delta / extent }
}

/// Resize one element by dragging `handle` to `pointer`.
///
/// The opposite edge or corner stays fixed in the rotated frame, or the
/// center when `centered`. `keep_aspect` scales both sides by the larger
/// ratio. Text always keeps its aspect and scales its font. Returns `None`
/// when the result would have zero size.
pub fn resize_single_element(
    original: &Element,
    handle: TransformHandleType,
    pointer: Point,
    keep_aspect: bool,
    centered: bool,
) -> Option<ElementData> {
    if handle == TransformHandleType::Rotation {
        return None;
    }
    let abs = element_abs_coords(original);
    let Bounds { min_x: x1, min_y: y1, max_x: x2, max_y: y2 } = abs;
    let (w0, h0) = (abs.width(), abs.height());
    let center = abs.center();
    let angle = original.angle;
    let p = pointer.rotate_around(center, -angle);
    let keep_aspect = keep_aspect || original.is_text();

    let factor = if centered { 2.0 } else { 1.0 };
    let mut sx = if handle.touches_east() {
        ratio(if centered { p.x - center.x } else { p.x - x1 } * factor, w0)
    } else if handle.touches_west() {
        ratio(if centered { center.x - p.x } else { x2 - p.x } * factor, w0)
    } else {
        1.0
    };
    let mut sy = if handle.touches_south() {
        ratio(if centered { p.y - center.y } else { p.y - y1 } * factor, h0)
    } else if handle.touches_north() {
        ratio(if centered { center.y - p.y } else { y2 - p.y } * factor, h0)
    } else {
        1.0
    };

    if keep_aspect {
        if handle.is_corner() {
            let s = sx.abs().max(sy.abs());
            sx = s.copysign(sx);
            sy = s.copysign(sy);
        } else if handle.touches_east() || handle.touches_west() {
            sy = sx.abs();
        } else {
            sx = sy.abs();
        }
    }
    if original.is_text() {
        sx = sx.abs();
        sy = sy.abs();
    }

    let (new_w, new_h) = (w0 * sx, h0 * sy);
    let degenerate = if original.is_linear() {
        new_w.abs() <= f32::EPSILON && new_h.abs() <= f32::EPSILON
    } else {
        new_w.abs() <= f32::EPSILON || new_h.abs() <= f32::EPSILON
    };
    if degenerate || !new_w.is_finite() || !new_h.is_finite() {
        return None;
    }

    let anchor = if centered {
        center
    } else {
        Point::new(
            if handle.touches_west() { x2 } else if handle.touches_east() { x1 } else { center.x },
            if handle.touches_north() { y2 } else if handle.touches_south() { y1 } else { center.y },
        )
    };
    let scale = |q: Point| Point::new(anchor.x + (q.x - anchor.x) * sx, anchor.y + (q.y - anchor.y) * sy);
    let new_box = Bounds::new(scale(abs.min()).x, scale(abs.min()).y, scale(Point::new(x2, y2)).x, scale(Point::new(x2, y2)).y);
    let local_center = new_box.center();
    let global_center = local_center.rotate_around(center, angle);

    let mut data = original.data().clone();
    if let Some(linear) = data.linear_mut() {
        let origin = Point::new(original.x, original.y);
        let moved: Vec<Point> = linear
            .points
            .iter()
            .map(|pt| scale(origin + *pt) - local_center + global_center)
            .collect();
        let first = moved.first().copied().unwrap_or(global_center);
        linear.points = moved.iter().map(|pt| *pt - first).collect();
        if let Some(c) = linear.last_committed_point.as_mut() {
            *c = scale(origin + *c) - local_center + global_center - first;
        }
        data.x = first.x;
        data.y = first.y;
        data.width = new_box.width();
        data.height = new_box.height();
        return Some(data);
    }

    data.width = new_box.width();
    data.height = new_box.height();
    data.x = global_center.x - data.width / 2.0;
    data.y = global_center.y - data.height / 2.0;
    if let Some(text) = data.text_mut() {
        text.font_size *= sy;
        text.baseline *= sy;
    }
    Some(data)
}

fn scale_about(data: &mut ElementData, anchor: Point, s: f32) {
    let abs = element_abs_coords(data);
    let center = abs.center();
    let new_center = anchor + (center - anchor) * s;
    if let Some(linear) = data.linear_mut() {
        for pt in linear.points.iter_mut() {
            *pt = *pt * s;
        }
        if let Some(c) = linear.last_committed_point.as_mut() {
            *c = *c * s;
        }
        let rel_center = (center - Point::new(data.x, data.y)) * s;
        data.x = new_center.x - rel_center.x;
        data.y = new_center.y - rel_center.y;
        data.width = abs.width() * s;
        data.height = abs.height() * s;
        return;
    }
    data.width = abs.width() * s;
    data.height = abs.height() * s;
    data.x = new_center.x - data.width / 2.0;
    data.y = new_center.y - data.height / 2.0;
    if let Some(text) = data.text_mut() {
        text.font_size *= s;
        text.baseline *= s;
    }
}

/// Uniformly scale a multi-selection by dragging a corner of its common box.
pub fn resize_multiple_elements(
    originals: &[&Element],
    handle: TransformHandleType,
    pointer: Point,
    centered: bool,
) -> Option<Vec<(ElementId, ElementData)>> {
    if !handle.is_corner() {
        return None;
    }
    let common = common_bounds(originals.iter().copied())?;
    let (w, h) = (common.width(), common.height());
    if w <= f32::EPSILON || h <= f32::EPSILON {
        return None;
    }
    let anchor = if centered {
        common.center()
    } else {
        Point::new(
            if handle.touches_west() { common.max_x } else { common.min_x },
            if handle.touches_north() { common.max_y } else { common.min_y },
        )
    };
    let dir = Point::new(
        if handle.touches_west() { -1.0 } else { 1.0 },
        if handle.touches_north() { -1.0 } else { 1.0 },
    );
    let (ew, eh) = if centered { (w / 2.0, h / 2.0) } else { (w, h) };
    let s = (dir.x * (pointer.x - anchor.x) / ew).max(dir.y * (pointer.y - anchor.y) / eh);
    if s <= f32::EPSILON || !s.is_finite() {
        return None;
    }
    Some(
        originals
            .iter()
            .map(|el| {
                let mut data = el.data().clone();
                scale_about(&mut data, anchor, s);
                (el.id().clone(), data)
            })
            .collect(),
    )
}

/// Which endpoint of a two-point line a corner handle moves.
pub fn resize_arrow_direction(handle: TransformHandleType, element: &Element) -> ArrowDirection {
    let Some(p) = element.linear().and_then(|l| l.points.get(1).copied()) else {
        return ArrowDirection::Origin;
    };
    let is_end = match handle {
        TransformHandleType::NW => p.x < 0.0 || p.y < 0.0,
        TransformHandleType::NE => p.x >= 0.0,
        TransformHandleType::SW => p.x <= 0.0,
        TransformHandleType::SE => p.x > 0.0 || p.y > 0.0,
        _ => false,
    };
    if is_end { ArrowDirection::End } else { ArrowDirection::Origin }
}

/// Move one endpoint of a two-point line to `pointer`; `snap` locks the
/// segment to 15° steps around the fixed endpoint.
///
/// The result is unrotated: a two-point line carries its direction in its points.
pub fn resize_two_point_linear(
    original: &Element,
    direction: ArrowDirection,
    pointer: Point,
    snap: bool,
) -> Option<ElementData> {
    let points = &original.linear()?.points;
    if points.len() != 2 {
        return None;
    }
    let start = crate::element::linear_point_global(original, 0)?;
    let end = crate::element::linear_point_global(original, 1)?;
    let fixed = match direction {
        ArrowDirection::End => start,
        ArrowDirection::Origin => end,
    };
    let mut delta = pointer - fixed;
    if snap {
        let (w, h) = perfect_element_size(ElementType::Line, delta.x, delta.y);
        delta = Point::new(w, h);
    }
    let moving = fixed + delta;
    let (from, to) = match direction {
        ArrowDirection::End => (fixed, moving),
        ArrowDirection::Origin => (moving, fixed),
    };
    let mut data = original.data().clone();
    data.x = from.x;
    data.y = from.y;
    data.angle = 0.0;
    data.width = (to.x - from.x).abs();
    data.height = (to.y - from.y).abs();
    if let Some(linear) = data.linear_mut() {
        linear.points = vec![Point::ZERO, to - from];
        linear.last_committed_point = None;
    }
    Some(data)
}
