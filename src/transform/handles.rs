//! Transform handle layout and hit testing.
//!
//! Handles are squares laid out around the unrotated box and then rotated
//! with the element. Sizes are viewport pixels divided by zoom.
//!
//! ```text
//!               [R]
//!   [NW]  ---  [N]  ---  [NE]
//!    |                    |
//!   [W]                  [E]
//!    |                    |
//!   [SW]  ---  [S]  ---  [SE]
//! ```

use crate::constants::{ROTATION_HANDLE_GAP, TRANSFORM_HANDLE_MARGIN, TRANSFORM_HANDLE_SIZE};
use crate::element::{element_abs_coords, Element};
use crate::geometry::{Bounds, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformHandleType {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
    Rotation,
}

impl TransformHandleType {
    pub const CORNERS: [TransformHandleType; 4] = [Self::NW, Self::NE, Self::SW, Self::SE];
    pub const SIDES: [TransformHandleType; 4] = [Self::N, Self::S, Self::E, Self::W];

    pub fn is_corner(self) -> bool {
        matches!(self, Self::NE | Self::NW | Self::SE | Self::SW)
    }

    pub fn is_side(self) -> bool {
        matches!(self, Self::N | Self::S | Self::E | Self::W)
    }

    pub fn touches_west(self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }

    pub fn touches_east(self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    pub fn touches_north(self) -> bool {
        matches!(self, Self::N | Self::NE | Self::NW)
    }

    pub fn touches_south(self) -> bool {
        matches!(self, Self::S | Self::SE | Self::SW)
    }
}

/// A handle square in the unrotated frame of its box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformHandle {
    pub handle_type: TransformHandleType,
    pub bounds: Bounds,
}

/// Handles around `bounds` (unrotated), skipping `omit`.
pub fn transform_handles_for_bounds(
    bounds: Bounds,
    zoom: f32,
    omit: &[TransformHandleType],
) -> Vec<TransformHandle> {
    let zoom = zoom.max(f32::EPSILON);
    let size = TRANSFORM_HANDLE_SIZE / zoom;
    let margin = TRANSFORM_HANDLE_MARGIN / zoom;
    let Bounds { min_x: x1, min_y: y1, max_x: x2, max_y: y2 } = bounds;
    let (cx, cy) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    let square = |x: f32, y: f32| Bounds::new(x, y, x + size, y + size);

    // side handles crowd the corners on small boxes
    let min_side = 5.0 * size;
    let show_ns = bounds.width() > min_side;
    let show_ew = bounds.height() > min_side;

    let all = [
        (TransformHandleType::NW, square(x1 - margin - size, y1 - margin - size), true),
        (TransformHandleType::NE, square(x2 + margin, y1 - margin - size), true),
        (TransformHandleType::SW, square(x1 - margin - size, y2 + margin), true),
        (TransformHandleType::SE, square(x2 + margin, y2 + margin), true),
        (
            TransformHandleType::Rotation,
            square(cx - size / 2.0, y1 - margin - size - ROTATION_HANDLE_GAP / zoom),
            true,
        ),
        (TransformHandleType::N, square(cx - size / 2.0, y1 - margin - size), show_ns),
        (TransformHandleType::S, square(cx - size / 2.0, y2 + margin), show_ns),
        (TransformHandleType::W, square(x1 - margin - size, cy - size / 2.0), show_ew),
        (TransformHandleType::E, square(x2 + margin, cy - size / 2.0), show_ew),
    ];
    all.into_iter()
        .filter(|(t, _, visible)| *visible && !omit.contains(t))
        .map(|(handle_type, bounds, _)| TransformHandle { handle_type, bounds })
        .collect()
}

fn omitted_for(element: &Element) -> &'static [TransformHandleType] {
    const LINE: [TransformHandleType; 5] = [
        TransformHandleType::N,
        TransformHandleType::S,
        TransformHandleType::E,
        TransformHandleType::W,
        TransformHandleType::Rotation,
    ];
    match element.linear() {
        Some(l) if l.points.len() == 2 => &LINE,
        _ => &[],
    }
}

/// Handles for a single selected element.
pub fn transform_handles(element: &Element, zoom: f32) -> Vec<TransformHandle> {
    transform_handles_for_bounds(element_abs_coords(element), zoom, omitted_for(element))
}

fn hit(handles: &[TransformHandle], local: Point) -> Option<TransformHandleType> {
    handles
        .iter()
        .find(|h| h.bounds.contains(local))
        .map(|h| h.handle_type)
}

/// Handle of a single selected element under `point`, rotation aware.
pub fn get_transform_handle_at(element: &Element, point: Point, zoom: f32) -> Option<TransformHandleType> {
    let center = element_abs_coords(element).center();
    let local = point.rotate_around(center, -element.angle);
    hit(&transform_handles(element, zoom), local)
}

/// Handle of a multi-selection's common box under `point`: corners and rotation only.
pub fn get_transform_handle_from_coords(common: Bounds, point: Point, zoom: f32) -> Option<TransformHandleType> {
    hit(
        &transform_handles_for_bounds(common, zoom, &TransformHandleType::SIDES),
        point,
    )
}
