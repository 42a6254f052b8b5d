//! Transient drag-preview paths.
//!
//! A [`Tail`] lives between "drag detected" and "drag released" on a
//! connector. It is never persisted; on a successful release its
//! [`allocate_joint_positions`](Tail::allocate_joint_positions) become the
//! joints of the new connection.

use tracing::trace;

use crate::geometry::Point;
use crate::graph::{ConnectorId, Side};
use crate::orthogonal::is_path_segment_horizontal;

/// Fewest joints a fresh route between the two sides needs. Every tail route
/// carries at least this many.
///
/// Perpendicular sides need a single joint, which makes the joint count odd.
pub fn minimum_joint_count(start: Side, end: Option<Side>) -> usize {
    match end {
        Some(end) if end.is_horizontal() != start.is_horizontal() => 1,
        _ => 2,
    }
}

/// Coordinates along (`u`) and across (`v`) the start side's axis.
#[derive(Clone, Copy, Debug)]
struct Frame {
    horizontal: bool,
}

impl Frame {
    fn to_uv(self, p: Point) -> (f32, f32) {
        if self.horizontal {
            (p.x, p.y)
        } else {
            (p.y, p.x)
        }
    }

    fn point(self, u: f32, v: f32) -> Point {
        if self.horizontal {
            Point::new(u, v)
        } else {
            Point::new(v, u)
        }
    }
}

/// Route a fresh rectilinear joint list from `start` to `end`.
fn route(start: Point, start_side: Side, end: Point, end_side: Option<Side>, stub: f32) -> Vec<Point> {
    let frame = Frame {
        horizontal: start_side.is_horizontal(),
    };
    let d = start_side.direction();
    let (su, sv) = frame.to_uv(start);
    let (eu, ev) = frame.to_uv(end);
    let has_room = (eu - su) * d >= 2.0 * stub;

    let joints = match end_side {
        Some(side) if side.is_horizontal() != start_side.is_horizontal() => {
            vec![frame.point(eu, sv)]
        }
        Some(side) if side.direction() == d => {
            // Both face the same way: go around behind the further one
            let u = if d > 0.0 { su.max(eu) + stub } else { su.min(eu) - stub };
            vec![frame.point(u, sv), frame.point(u, ev)]
        }
        Some(side) if !has_room => {
            let a = su + d * stub;
            let b = eu + side.direction() * stub;
            let mid_v = ((sv + ev) / 2.0).round();
            vec![
                frame.point(a, sv),
                frame.point(a, mid_v),
                frame.point(b, mid_v),
                frame.point(b, ev),
            ]
        }
        _ => {
            let mid_u = if has_room {
                ((su + eu) / 2.0).round()
            } else {
                su + d * stub
            };
            vec![frame.point(mid_u, sv), frame.point(mid_u, ev)]
        }
    };
    debug_assert!(joints.len() >= minimum_joint_count(start_side, end_side));
    joints
}

/// An in-progress, visual-only path anchored to one connector.
#[derive(Clone, Debug, PartialEq)]
pub struct Tail {
    source: ConnectorId,
    source_position: Point,
    source_side: Side,
    end: Point,
    end_side: Option<Side>,
    preserved: Option<Vec<Point>>,
    minimum_stub: f32,
}

impl Tail {
    pub fn new(source: ConnectorId, source_position: Point, source_side: Side, minimum_stub: f32) -> Self {
        Self {
            source,
            source_position,
            source_side,
            end: source_position,
            end_side: None,
            preserved: None,
            minimum_stub,
        }
    }

    /// Reproduce the shape of a detached connection. `joints` run from this
    /// tail's source towards the cursor.
    pub fn with_preserved_joints(mut self, joints: Vec<Point>) -> Self {
        self.preserved = (!joints.is_empty()).then_some(joints);
        self
    }

    pub fn source(&self) -> ConnectorId {
        self.source
    }

    pub fn source_position(&self) -> Point {
        self.source_position
    }

    pub fn source_side(&self) -> Side {
        self.source_side
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn end_side(&self) -> Option<Side> {
        self.end_side
    }

    pub fn preserved_joints(&self) -> Option<&[Point]> {
        self.preserved.as_deref()
    }

    /// Move the free end: to the cursor (`side == None`) or onto a hovered
    /// connector.
    pub fn update_end(&mut self, end: Point, side: Option<Side>) {
        self.end = end;
        self.end_side = side;
        trace!(source = %self.source, x = end.x, y = end.y, "tail end moved");
    }

    /// Joint positions for the current end.
    pub fn allocate_joint_positions(&self) -> Vec<Point> {
        let Some(preserved) = &self.preserved else {
            return route(
                self.source_position,
                self.source_side,
                self.end,
                self.end_side,
                self.minimum_stub,
            );
        };

        let mut joints = preserved.clone();
        let last_leg = joints.len();
        if let Some(last) = joints.last_mut() {
            if is_path_segment_horizontal(self.source_side.is_horizontal(), last_leg) {
                last.y = self.end.y;
            } else {
                last.x = self.end.x;
            }
        }
        joints
    }

    /// Full preview polyline: source, joints, end.
    pub fn points(&self) -> Vec<Point> {
        let mut points = vec![self.source_position];
        points.extend(self.allocate_joint_positions());
        points.push(self.end);
        points
    }
}
