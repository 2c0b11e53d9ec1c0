//! Translating a selection.

use crate::constants::DRAGGING_THRESHOLD;
use crate::element::{common_bounds, Element, ElementId};
use crate::geometry::Point;

/// Axis a shift-drag is constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLock {
    /// Moves along x only
    Horizontal,
    /// Moves along y only
    Vertical,
}

impl AxisLock {
    /// Keep an established lock; otherwise pick the dominant axis once the
    /// pointer has moved past the drag threshold. No lock without shift.
    pub fn resolve(current: Option<AxisLock>, shift: bool, distance: Point) -> Option<AxisLock> {
        if !shift {
            return None;
        }
        if current.is_some() {
            return current;
        }
        let (dx, dy) = (distance.x.abs(), distance.y.abs());
        if dx.max(dy) < DRAGGING_THRESHOLD {
            return None;
        }
        Some(if dx >= dy { AxisLock::Horizontal } else { AxisLock::Vertical })
    }
}

/// Offset from the selection's common top-left to the pointer-down origin.
pub fn drag_offset(selected: &[&Element], origin: Point) -> Point {
    common_bounds(selected.iter().copied())
        .map(|b| origin - b.min())
        .unwrap_or(Point::ZERO)
}

/// New positions for `originals` so that their common top-left lands on `target`.
pub fn drag_selected_elements(
    originals: &[&Element],
    target: Point,
    lock: Option<AxisLock>,
) -> Vec<(ElementId, Point)> {
    let Some(bounds) = common_bounds(originals.iter().copied()) else {
        return Vec::new();
    };
    let offset = target - bounds.min();
    originals
        .iter()
        .map(|el| {
            let x = if lock == Some(AxisLock::Vertical) { el.x } else { el.x + offset.x };
            let y = if lock == Some(AxisLock::Horizontal) { el.y } else { el.y + offset.y };
            (el.id().clone(), Point::new(x, y))
        })
        .collect()
}
