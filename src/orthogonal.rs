//! Orthogonal path model.
//!
//! A connection's full point sequence is `source, joint 0, ..., joint n-1,
//! target`. Segments alternate strictly between horizontal and vertical, and
//! the alternation is fixed by the source connector's side: a path leaving a
//! left/right connector starts horizontally.
//!
//! Adjacent joints are kept rectilinear with an axis arena. Every joint refers
//! to one cell for its x and one for its y; the two joints of a horizontal
//! segment share a y cell, the two joints of a vertical segment share an x
//! cell. Moving a joint writes its cells, so the bound neighbour follows
//! without any observer machinery.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::geometry::Point;
use crate::graph::{ConnectionId, ConnectorId, GraphModel, JointId, Side};

/// Whether the segment from joint `i` to joint `i + 1` is horizontal.
///
/// Horizontal iff `(source side is left/right) XNOR (i is odd)`.
pub fn is_segment_horizontal(source_side: Side, i: usize) -> bool {
    source_side.is_horizontal() == (i % 2 == 1)
}

/// Whether segment `k` of the full point sequence (segment 0 leaves the
/// source connector) is horizontal.
pub fn is_path_segment_horizontal(source_horizontal: bool, k: usize) -> bool {
    source_horizontal != (k % 2 == 1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct JointAxes {
    x: usize,
    y: usize,
}

/// The live, rectilinear geometry of one connection's joints.
#[derive(Clone, Debug)]
pub struct OrthogonalPath {
    source_horizontal: bool,
    cells: Vec<f32>,
    joints: Vec<JointAxes>,
}

impl OrthogonalPath {
    pub fn new(source_side: Side) -> Self {
        Self {
            source_horizontal: source_side.is_horizontal(),
            cells: Vec::new(),
            joints: Vec::new(),
        }
    }

    pub fn with_joints(source_side: Side, positions: &[Point]) -> Self {
        let mut path = Self::new(source_side);
        path.bind(positions);
        path
    }

    pub fn source_horizontal(&self) -> bool {
        self.source_horizontal
    }

    /// Whether the segment from joint `i` to joint `i + 1` is horizontal.
    pub fn is_segment_horizontal(&self, i: usize) -> bool {
        self.source_horizontal == (i % 2 == 1)
    }

    /// Install bindings for a new joint set, replacing any previous ones.
    ///
    /// Where the input is not rectilinear, the coordinate of the joint nearer
    /// the source wins.
    pub fn bind(&mut self, positions: &[Point]) {
        self.unbind();
        for (i, position) in positions.iter().enumerate() {
            let axes = match i.checked_sub(1).map(|prev| (prev, self.joints[prev])) {
                None => JointAxes {
                    x: self.push_cell(position.x),
                    y: self.push_cell(position.y),
                },
                Some((prev, prev_axes)) if self.is_segment_horizontal(prev) => JointAxes {
                    x: self.push_cell(position.x),
                    y: prev_axes.y,
                },
                Some((_, prev_axes)) => JointAxes {
                    x: prev_axes.x,
                    y: self.push_cell(position.y),
                },
            };
            self.joints.push(axes);
        }
        trace!(joints = self.joints.len(), cells = self.cells.len(), "bound joints");
    }

    /// Remove every binding and joint.
    pub fn unbind(&mut self) {
        self.cells.clear();
        self.joints.clear();
    }

    fn push_cell(&mut self, value: f32) -> usize {
        self.cells.push(value);
        self.cells.len() - 1
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn joint_position(&self, i: usize) -> Option<Point> {
        self.joints
            .get(i)
            .map(|axes| Point::new(self.cells[axes.x], self.cells[axes.y]))
    }

    pub fn joint_positions(&self) -> Vec<Point> {
        self.joints
            .iter()
            .map(|axes| Point::new(self.cells[axes.x], self.cells[axes.y]))
            .collect()
    }

    /// Move joint `i`. The neighbours bound to it move along.
    pub fn set_joint_position(&mut self, i: usize, position: Point) -> bool {
        let Some(axes) = self.joints.get(i).copied() else {
            return false;
        };
        self.cells[axes.x] = position.x;
        self.cells[axes.y] = position.y;
        true
    }

    /// Insert joints before index `index` and rebind.
    pub fn insert_joints(&mut self, index: usize, positions: &[Point]) {
        let mut all = self.joint_positions();
        let index = index.min(all.len());
        all.splice(index..index, positions.iter().copied());
        self.bind(&all);
    }

    /// Full point sequence: source, joints, target.
    pub fn points(&self, source: Point, target: Point) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.joints.len() + 2);
        points.push(source);
        points.extend(self.joint_positions());
        points.push(target);
        points
    }

    /// Restrict a proposed position for joint `i`.
    ///
    /// The first joint stays on the source connector's axis and the last joint
    /// on the target connector's axis, unless the respective node is selected
    /// and therefore moving with the joint.
    pub fn constrain_joint(
        &self,
        i: usize,
        proposed: Point,
        source: Point,
        target: Point,
        source_node_selected: bool,
        target_node_selected: bool,
    ) -> Point {
        let mut constrained = proposed;
        let last = self.joints.len().saturating_sub(1);

        if i == 0 && !source_node_selected {
            if is_path_segment_horizontal(self.source_horizontal, 0) {
                constrained.y = source.y;
            } else {
                constrained.x = source.x;
            }
        }
        if i == last && !self.joints.is_empty() && !target_node_selected {
            if is_path_segment_horizontal(self.source_horizontal, self.joints.len()) {
                constrained.y = target.y;
            } else {
                constrained.x = target.x;
            }
        }
        constrained
    }

    /// Snap the first and last joints back onto their connectors' axes.
    ///
    /// Returns every corrected joint with its new position. Runs one pass only;
    /// callers redraw from the returned corrections instead of re-entering.
    pub fn align_endpoints(&mut self, source: Point, target: Point) -> Vec<(usize, Point)> {
        let mut corrections: Vec<(usize, Point)> = Vec::new();
        if self.joints.is_empty() {
            return corrections;
        }

        let ends = [
            (0, 0, source),
            (self.joints.len() - 1, self.joints.len(), target),
        ];
        for (joint, segment, anchor) in ends {
            let axes = self.joints[joint];
            let (cell, wanted) = if is_path_segment_horizontal(self.source_horizontal, segment) {
                (axes.y, anchor.y)
            } else {
                (axes.x, anchor.x)
            };
            if self.cells[cell] != wanted {
                self.cells[cell] = wanted;
                let position = Point::new(self.cells[axes.x], self.cells[axes.y]);
                match corrections.iter_mut().find(|(index, _)| *index == joint) {
                    Some(existing) => existing.1 = position,
                    None => corrections.push((joint, position)),
                }
            }
        }
        corrections
    }
}

/// Live routing state of one connection.
#[derive(Clone, Debug)]
pub struct RoutedConnection {
    pub path: OrthogonalPath,
    pub joint_ids: Vec<JointId>,
    pub source: ConnectorId,
    pub target: ConnectorId,
    /// Model positions the arena was last bound from.
    bound_positions: Vec<Point>,
}

impl RoutedConnection {
    pub fn joint_index(&self, joint: JointId) -> Option<usize> {
        self.joint_ids.iter().position(|&id| id == joint)
    }
}

/// Routing state for every connection of a model.
#[derive(Debug, Default)]
pub struct RoutingTable {
    routes: HashMap<ConnectionId, RoutedConnection>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the arenas in line with the model.
    ///
    /// Connections whose joint set or persisted joint positions changed since
    /// the last bind are unbound and rebound; connections that vanished are
    /// dropped. Live edits to an arena survive as long as the model does not
    /// change underneath them. Returns how many connections were rebound.
    pub fn sync(&mut self, model: &GraphModel) -> usize {
        self.routes
            .retain(|id, _| model.connection(*id).is_some());

        let mut rebound = 0;
        for connection in model.connections() {
            let Some(side) = model.source_side(connection) else {
                warn!(connection = %connection.id, "source connector missing, connection not routed");
                self.routes.remove(&connection.id);
                continue;
            };
            let joint_ids = connection.joint_ids();
            let positions = connection.joint_positions();

            let up_to_date = self.routes.get(&connection.id).is_some_and(|route| {
                route.joint_ids == joint_ids
                    && route.path.source_horizontal() == side.is_horizontal()
                    && route.bound_positions == positions
            });
            if up_to_date {
                continue;
            }

            let route = self
                .routes
                .entry(connection.id)
                .or_insert_with(|| RoutedConnection {
                    path: OrthogonalPath::new(side),
                    joint_ids: Vec::new(),
                    source: connection.source,
                    target: connection.target,
                    bound_positions: Vec::new(),
                });
            route.path.unbind();
            route.path = OrthogonalPath::with_joints(side, &positions);
            route.bound_positions = positions;
            route.joint_ids = joint_ids;
            route.source = connection.source;
            route.target = connection.target;
            rebound += 1;
        }
        if rebound > 0 {
            debug!(rebound, "routing arenas synced");
        }
        rebound
    }

    pub fn route(&self, connection: ConnectionId) -> Option<&RoutedConnection> {
        self.routes.get(&connection)
    }

    pub fn route_mut(&mut self, connection: ConnectionId) -> Option<&mut RoutedConnection> {
        self.routes.get_mut(&connection)
    }

    /// Locate a joint: its connection and index within it.
    pub fn joint_location(&self, joint: JointId) -> Option<(ConnectionId, usize)> {
        self.routes
            .iter()
            .find_map(|(&id, route)| route.joint_index(joint).map(|index| (id, index)))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
