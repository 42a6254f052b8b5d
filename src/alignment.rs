//! Alignment snapping for dragged joints.
//!
//! On press, the stationary segments on either side of the dragged joint offer
//! at most one x and one y value to snap to. A segment counts as stationary if
//! none of its points is selected; the connection's end points count as
//! selected when their node is.

use tracing::{debug, trace, warn};

use crate::commands::{replace_joint_positions, CommandFacility, EditCommand};
use crate::geometry::{round_to_grid_spacing, Point};
use crate::graph::{ConnectionId, GraphModel, JointId};
use crate::orthogonal::{is_path_segment_horizontal, RoutingTable};
use crate::selection::SelectionQuery;
use crate::state::SkinLookup;
use crate::waypoints::cleanup_positions;

/// Snap candidates per axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlignmentTargets {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
}

impl AlignmentTargets {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty()
    }

    fn push(&mut self, horizontal_segment: bool, point: Point) {
        if horizontal_segment {
            self.y.push(point.y);
        } else {
            self.x.push(point.x);
        }
    }
}

/// Alignment targets for joint `joint` of the full point sequence `points`.
///
/// `selected` runs parallel to `points`. Only connections with more than two
/// joints produce targets.
pub fn alignment_targets(
    points: &[Point],
    selected: &[bool],
    source_horizontal: bool,
    joint: usize,
) -> AlignmentTargets {
    let mut targets = AlignmentTargets::default();
    let joint_count = points.len().saturating_sub(2);
    if joint_count <= 2 || joint >= joint_count || selected.len() != points.len() {
        return targets;
    }

    let k = joint + 1;
    let last = points.len() - 1;

    if k >= 2 && !selected[k - 2] && !selected[k - 1] {
        targets.push(is_path_segment_horizontal(source_horizontal, k - 2), points[k - 1]);
    }
    if k + 2 <= last && !selected[k + 1] && !selected[k + 2] {
        targets.push(is_path_segment_horizontal(source_horizontal, k + 1), points[k + 1]);
    }
    targets
}

fn snap_axis(value: f32, targets: &[f32], threshold: f32) -> f32 {
    targets
        .iter()
        .map(|&target| (target, (target - value).abs()))
        .filter(|&(_, distance)| distance <= threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(value, |(target, _)| target)
}

/// Snap a proposed joint position. Grid snapping, when active, wins over
/// alignment on both axes.
pub fn snap_position(
    proposed: Point,
    targets: &AlignmentTargets,
    threshold: f32,
    grid: Option<f32>,
) -> Point {
    match grid {
        Some(spacing) => Point::new(
            round_to_grid_spacing(proposed.x, spacing),
            round_to_grid_spacing(proposed.y, spacing),
        ),
        None => Point::new(
            snap_axis(proposed.x, &targets.x, threshold),
            snap_axis(proposed.y, &targets.y, threshold),
        ),
    }
}

/// Dragging an existing joint.
///
/// Works on the live routing arena so bound neighbours follow; on release one
/// `MoveJoints` command is committed if anything moved.
#[derive(Clone, Debug)]
pub struct JointDrag {
    connection: ConnectionId,
    joint: JointId,
    index: usize,
    original: Vec<Point>,
    targets: AlignmentTargets,
    source: Point,
    target: Point,
    source_selected: bool,
    target_selected: bool,
}

impl JointDrag {
    /// Start dragging `joint`. Returns `None` if it or its connection is
    /// unknown or the endpoints have no geometry.
    pub fn begin(
        model: &GraphModel,
        routing: &RoutingTable,
        skins: &dyn SkinLookup,
        selection: &dyn SelectionQuery,
        joint: JointId,
    ) -> Option<Self> {
        let Some((connection_id, index)) = routing.joint_location(joint) else {
            warn!(%joint, "pressed joint vanished, drag abandoned");
            return None;
        };
        let connection = model.connection(connection_id)?;
        let route = routing.route(connection_id)?;
        let source = skins.connector_position(connection.source)?;
        let target = skins.connector_position(connection.target)?;

        let source_selected = model
            .node_of(connection.source)
            .is_some_and(|node| selection.is_node_selected(node));
        let target_selected = model
            .node_of(connection.target)
            .is_some_and(|node| selection.is_node_selected(node));

        let points = route.path.points(source, target);
        let mut selected = Vec::with_capacity(points.len());
        selected.push(source_selected);
        selected.extend(route.joint_ids.iter().map(|&id| selection.is_joint_selected(id)));
        selected.push(target_selected);

        let targets = alignment_targets(&points, &selected, route.path.source_horizontal(), index);
        debug!(%joint, connection = %connection_id, index, ?targets, "joint drag started");

        Some(Self {
            connection: connection_id,
            joint,
            index,
            original: route.path.joint_positions(),
            targets,
            source,
            target,
            source_selected,
            target_selected,
        })
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn joint(&self) -> JointId {
        self.joint
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn targets(&self) -> &AlignmentTargets {
        &self.targets
    }

    /// Move the joint towards `cursor`, returning where it ended up.
    pub fn drag_to(
        &self,
        routing: &mut RoutingTable,
        cursor: Point,
        threshold: f32,
        grid: Option<f32>,
    ) -> Option<Point> {
        let route = routing.route_mut(self.connection)?;
        let snapped = snap_position(cursor, &self.targets, threshold, grid);
        let position = route.path.constrain_joint(
            self.index,
            snapped,
            self.source,
            self.target,
            self.source_selected,
            self.target_selected,
        );
        route.path.set_joint_position(self.index, position);
        trace!(joint = %self.joint, x = position.x, y = position.y, "joint dragged");
        Some(position)
    }

    /// Commit the drag. Returns true if a command was executed.
    ///
    /// Joints that ended up collapsing onto each other are removed, in which
    /// case the whole joint list is replaced instead of moved.
    pub fn finish(self, routing: &RoutingTable, commands: &mut dyn CommandFacility) -> bool {
        let Some(route) = routing.route(self.connection) else {
            return false;
        };
        let Some(existing) = commands.model().connection(self.connection) else {
            warn!(connection = %self.connection, "connection vanished, joint drag abandoned");
            return false;
        };

        let live = route.path.joint_positions();
        if live == self.original {
            debug!(joint = %self.joint, "joint drag left shape unchanged");
            return false;
        }

        let cleaned = cleanup_positions(&live);
        let result = if cleaned.len() < live.len() {
            let joint_type = existing
                .joints
                .first()
                .map(|joint| joint.joint_type.clone())
                .unwrap_or_else(|| "joint".to_string());
            debug!(
                connection = %self.connection,
                removed = live.len() - cleaned.len(),
                "collapsed joints removed"
            );
            replace_joint_positions(commands, self.connection, &joint_type, &cleaned)
        } else {
            let positions: Vec<(JointId, Point)> = route
                .joint_ids
                .iter()
                .copied()
                .zip(live)
                .zip(&self.original)
                .filter(|((_, now), before)| now != *before)
                .map(|(moved, _)| moved)
                .collect();
            let moved = positions.len();
            debug!(connection = %self.connection, moved, "joints moved");
            commands.execute(EditCommand::MoveJoints {
                connection: self.connection,
                positions,
            })
        };

        match result {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, connection = %self.connection, "joint move failed");
                false
            }
        }
    }

    /// Put the live arena back to where it was at press time.
    pub fn cancel(self, routing: &mut RoutingTable) {
        if let Some(route) = routing.route_mut(self.connection) {
            route.path.bind(&self.original);
        }
    }
}
