//! Two-finger pinch tracking.

use crate::geometry::{centroid, Point};
use std::collections::HashMap;

/// Pressed pointers and the pinch baseline captured when the second one lands.
#[derive(Debug, Clone, Default)]
pub struct PinchGesture {
    pointers: HashMap<u32, Point>,
    pub last_center: Option<Point>,
    pub initial_distance: Option<f32>,
    pub initial_scale: Option<f32>,
}

/// Pan and zoom produced by one pinch move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchStep {
    /// Viewport delta of the pointers' centroid
    pub pan: Point,
    /// Zoom to apply, before normalization
    pub scale: f32,
    pub center: Point,
}

impl PinchGesture {
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    pub fn contains(&self, pointer_id: u32) -> bool {
        self.pointers.contains_key(&pointer_id)
    }

    pub fn is_pinching(&self) -> bool {
        self.pointers.len() >= 2
    }

    fn center(&self) -> Point {
        centroid(self.pointers.values())
    }

    fn spread(&self) -> Option<f32> {
        let mut it = self.pointers.values();
        let (a, b) = (it.next()?, it.next()?);
        Some(a.distance(*b))
    }

    /// Register a pressed pointer. The second pointer captures the baseline.
    pub fn pointer_down(&mut self, pointer_id: u32, position: Point, current_zoom: f32) {
        self.pointers.insert(pointer_id, position);
        if self.pointers.len() == 2 {
            self.last_center = Some(self.center());
            self.initial_scale = Some(current_zoom);
            self.initial_distance = self.spread();
        }
    }

    /// Track a move. Returns the step to apply while two pointers are down.
    pub fn pointer_move(&mut self, pointer_id: u32, position: Point) -> Option<PinchStep> {
        if let Some(p) = self.pointers.get_mut(&pointer_id) {
            *p = position;
        }
        if self.pointers.len() != 2 {
            self.reset_baseline();
            return None;
        }
        let (Some(last), Some(initial_distance), Some(initial_scale)) =
            (self.last_center, self.initial_distance, self.initial_scale)
        else {
            self.reset_baseline();
            return None;
        };
        if initial_distance <= f32::EPSILON {
            return None;
        }
        let center = self.center();
        self.last_center = Some(center);
        let distance = self.spread()?;
        Some(PinchStep {
            pan: center - last,
            scale: initial_scale * distance / initial_distance,
            center,
        })
    }

    pub fn pointer_up(&mut self, pointer_id: u32) {
        self.pointers.remove(&pointer_id);
        if self.pointers.len() < 2 {
            self.reset_baseline();
        }
    }

    pub fn clear(&mut self) {
        self.pointers.clear();
        self.reset_baseline();
    }

    fn reset_baseline(&mut self) {
        self.last_center = None;
        self.initial_distance = None;
        self.initial_scale = None;
    }
}
