//! Bounding boxes in scene coordinates.

use super::{Element, ElementData};
use crate::geometry::{Bounds, Point};

/// Unrotated box of an element. For linear elements this is the span of
/// the points, which may extend left of or above the origin.
pub fn element_abs_coords(data: &ElementData) -> Bounds {
    if let Some(linear) = data.linear() {
        if linear.points.is_empty() {
            return Bounds::new(data.x, data.y, data.x, data.y);
        }
        let span = Bounds::from_points(linear.points.iter().copied());
        return Bounds::new(
            span.min_x + data.x,
            span.min_y + data.y,
            span.max_x + data.x,
            span.max_y + data.y,
        );
    }
    Bounds::new(data.x, data.y, data.x + data.width, data.y + data.height)
}

/// Rotation center.
pub fn element_center(data: &ElementData) -> Point {
    element_abs_coords(data).center()
}

/// Axis-aligned box that contains the rotated element.
pub fn element_bounds(data: &ElementData) -> Bounds {
    let abs = element_abs_coords(data);
    if data.angle == 0.0 {
        return abs;
    }
    let center = abs.center();
    if let Some(linear) = data.linear() {
        let origin = Point::new(data.x, data.y);
        return Bounds::from_points(
            linear
                .points
                .iter()
                .map(|p| (origin + *p).rotate_around(center, data.angle)),
        );
    }
    Bounds::from_points(
        abs.corners()
            .into_iter()
            .map(|c| c.rotate_around(center, data.angle)),
    )
}

/// Union of [`element_bounds`] over `elements`. `None` when the iterator is empty.
pub fn common_bounds<'a, I>(elements: I) -> Option<Bounds>
where
    I: IntoIterator<Item = &'a Element>,
{
    elements
        .into_iter()
        .map(|el| element_bounds(el))
        .reduce(|a, b| a.union(&b))
}

/// Scene position of a linear element's point, rotation applied.
pub fn linear_point_global(data: &ElementData, index: usize) -> Option<Point> {
    let linear = data.linear()?;
    let p = *linear.points.get(index)?;
    let center = element_center(data);
    Some((Point::new(data.x, data.y) + p).rotate_around(center, data.angle))
}
