//! Point-level edits on linear elements.

use super::bounds::element_center;
use super::ElementData;
use crate::geometry::{Bounds, Point};

/// Convert a scene point into the element's point space (origin-relative, unrotated).
pub fn point_from_absolute(data: &ElementData, absolute: Point) -> Point {
    let center = element_center(data);
    absolute.rotate_around(center, -data.angle) - Point::new(data.x, data.y)
}

/// Move point `index` to `target` (point space), keeping `points[0]` at the
/// origin and the rotation center consistent.
pub fn move_linear_point(data: &mut ElementData, index: usize, target: Point) {
    let angle = data.angle;
    let Some(linear) = data.linear() else { return };
    let Some(&current) = linear.points.get(index) else {
        return;
    };
    let prev_span = Bounds::from_points(linear.points.iter().copied());

    let (next_points, offset): (Vec<Point>, Point) = if index == 0 {
        let delta = target - current;
        let points = linear
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| if i == 0 { Point::ZERO } else { *p - delta })
            .collect();
        (points, delta)
    } else {
        let mut points = linear.points.clone();
        points[index] = target;
        (points, Point::ZERO)
    };

    let next_span = Bounds::from_points(next_points.iter().copied());
    let drift = prev_span.center() - next_span.center();
    let shift = offset.rotate_around(drift, angle);

    data.x += shift.x;
    data.y += shift.y;
    data.width = next_span.width();
    data.height = next_span.height();
    if let Some(linear) = data.linear_mut() {
        linear.points = next_points;
    }
}
