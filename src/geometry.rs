//! Plane geometry shared by the element model, transforms and hit testing.
//!
//! All coordinates are scene units unless a function says otherwise. Every
//! function here is total: degenerate input (zero lengths, NaN) produces a
//! harmless value instead of an error.

use crate::constants::LINE_CONFIRM_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

// ============================================================================
// Point
// ============================================================================

/// A 2D point or vector. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(self) -> Point {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            Point::ZERO
        } else {
            Point::new(self.x / len, self.y / len)
        }
    }

    #[inline]
    pub fn dot(self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Rotate this point around `center` by `angle` radians (clockwise in screen space).
    pub fn rotate_around(self, center: Point, angle: f32) -> Point {
        if angle == 0.0 {
            return self;
        }
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point::new(
            dx * cos - dy * sin + center.x,
            dx * sin + dy * cos + center.y,
        )
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    /// Smallest box containing every point. Empty input yields a zero box at the origin.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Bounds::default();
        };
        iter.fold(
            Bounds::new(first.x, first.y, first.x, first.y),
            |b, p| Bounds {
                min_x: b.min_x.min(p.x),
                min_y: b.min_y.min(p.y),
                max_x: b.max_x.max(p.x),
                max_y: b.max_y.max(p.y),
            },
        )
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    #[inline]
    pub fn min(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Strict containment, used for the "near a selection box" checks.
    pub fn contains_strict(&self, p: Point) -> bool {
        p.x > self.min_x && p.x < self.max_x && p.y > self.min_y && p.y < self.max_y
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn inflate(&self, by: f32) -> Bounds {
        Bounds {
            min_x: self.min_x - by,
            min_y: self.min_y - by,
            max_x: self.max_x + by,
            max_y: self.max_y + by,
        }
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }
}

// ============================================================================
// Free functions
// ============================================================================

/// Snap a coordinate pair to the grid. `None` disables snapping.
pub fn grid_point(x: f32, y: f32, grid_size: Option<f32>) -> Point {
    match grid_size {
        Some(size) if size > 0.0 => Point::new(
            (x / size).round() * size,
            (y / size).round() * size,
        ),
        _ => Point::new(x, y),
    }
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Shortest distance from `p` to an open polyline.
pub fn distance_to_polyline(p: Point, points: &[Point]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => p.distance(*only),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Even-odd point-in-polygon test.
pub fn is_point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// A polyline closes on itself when it has at least three points and its
/// ends lie within the commit threshold of each other.
pub fn is_path_a_loop(points: &[Point], zoom: f32) -> bool {
    if points.len() < 3 {
        return false;
    }
    let (first, last) = (points[0], points[points.len() - 1]);
    first.distance(last) <= LINE_CONFIRM_THRESHOLD / zoom.max(f32::EPSILON)
}

/// Centroid of a set of points, or the origin when empty.
pub fn centroid<'a, I: IntoIterator<Item = &'a Point>>(points: I) -> Point {
    let (sum, count) = points
        .into_iter()
        .fold((Point::ZERO, 0usize), |(s, c), p| (s + *p, c + 1));
    if count == 0 {
        Point::ZERO
    } else {
        sum * (1.0 / count as f32)
    }
}

/// Ramer-Douglas-Peucker simplification. The first and last point are kept.
pub fn simplify_points(points: &[Point], tolerance: f32) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    let mut stack = vec![(0usize, points.len() - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (mut max_dist, mut index) = (0.0f32, start);
        for i in (start + 1)..end {
            let d = distance_to_segment(points[i], points[start], points[end]);
            if d > max_dist {
                max_dist = d;
                index = i;
            }
        }
        if max_dist > tolerance {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }
    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Normalize an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let tau = std::f32::consts::TAU;
    let a = angle % tau;
    if a < 0.0 { a + tau } else { a }
}

/// Where the ray from `from` through `to` first enters the rectangle `bounds`.
/// Returns `None` when the ray misses or starts inside.
pub fn ray_box_entry(from: Point, to: Point, bounds: &Bounds) -> Option<Point> {
    let dir = to - from;
    let (mut t_min, mut t_max) = (f32::NEG_INFINITY, f32::INFINITY);
    for (origin, d, lo, hi) in [
        (from.x, dir.x, bounds.min_x, bounds.max_x),
        (from.y, dir.y, bounds.min_y, bounds.max_y),
    ] {
        if d.abs() <= f32::EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
        } else {
            let t1 = (lo - origin) / d;
            let t2 = (hi - origin) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }
    }
    if t_max < t_min || t_min <= 0.0 {
        return None;
    }
    Some(from + dir * t_min)
}
