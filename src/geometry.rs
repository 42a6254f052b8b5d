//! Point arithmetic and the small predicates the routing code is built on.
//!
//! Everything here is pure: no state, no allocation beyond the return value.

use std::ops::{Add, Sub};

/// A position in editor (world) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
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

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// Axis-aligned rectangle, as reported by a node skin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(&self, point: Point) -> bool {
        check_in_range(self.x, self.x + self.width, point.x)
            && check_in_range(self.y, self.y + self.height, point.y)
    }
}

/// Returns true if `x` lies between `a` and `b`, inclusive, in either order.
pub fn check_in_range(a: f32, b: f32, x: f32) -> bool {
    if a <= b {
        a <= x && x <= b
    } else {
        b <= x && x <= a
    }
}

fn check_strictly_in_range(a: f32, b: f32, x: f32) -> bool {
    if a <= b {
        a < x && x < b
    } else {
        b < x && x < a
    }
}

/// Checks whether the horizontal segment `ab` crosses the vertical segment `cd`.
///
/// Containment is tested on open intervals along both axes, so segments that
/// merely touch at an endpoint do not intersect.
pub fn check_intersection(a: Point, b: Point, c: Point, d: Point) -> bool {
    check_strictly_in_range(a.x, b.x, c.x) && check_strictly_in_range(c.y, d.y, a.y)
}

/// Rounds both coordinates to whole pixels.
pub fn round_point(point: Point) -> Point {
    Point::new(point.x.round(), point.y.round())
}

/// Rounds `value` to the nearest multiple of `spacing`.
///
/// A non-positive spacing leaves the value untouched.
pub fn round_to_grid_spacing(value: f32, spacing: f32) -> f32 {
    if spacing <= 0.0 {
        return value;
    }
    (value / spacing).round() * spacing
}

/// Rounds both coordinates to the nearest grid intersection.
pub fn snap_to_grid(point: Point, spacing: f32) -> Point {
    Point::new(
        round_to_grid_spacing(point.x, spacing),
        round_to_grid_spacing(point.y, spacing),
    )
}
