//! Waypoint insertion and cleanup.
//!
//! Pressing on a connection's path splits the nearest segment with two
//! coincident joints and binds the second one to the cursor. The joints live in
//! a [`DraftPath`] until release; only a release that changes the connection's
//! shape reaches the command facility, as one joint replacement.

use std::collections::BTreeSet;

use slint::platform::PointerEventButton;
use tracing::{debug, trace, warn};

use crate::commands::{replace_joint_positions, CommandFacility};
use crate::geometry::{round_point, snap_to_grid, Point};
use crate::graph::{ConnectionId, GraphModel};
use crate::hit_test::{nearest_segment, path_offset};
use crate::orthogonal::{is_path_segment_horizontal, OrthogonalPath, RoutingTable};
use crate::properties::EditorProperties;
use crate::state::SkinLookup;

/// Indices of joints that collapse away.
///
/// Repeatedly takes the last adjacent pair of exactly equal positions out of a
/// working copy, as long as it holds more than two entries, and marks the first
/// two not yet marked original indices holding that position.
pub fn find_joints_to_cleanup(positions: &[Point]) -> BTreeSet<usize> {
    let mut working = positions.to_vec();
    let mut marked = BTreeSet::new();

    while working.len() > 2 {
        let Some(i) = (0..working.len() - 1)
            .rev()
            .find(|&i| working[i] == working[i + 1])
        else {
            break;
        };
        let value = working[i];
        working.drain(i..i + 2);

        let pair: Vec<usize> = positions
            .iter()
            .enumerate()
            .filter(|&(index, &p)| p == value && !marked.contains(&index))
            .map(|(index, _)| index)
            .take(2)
            .collect();
        marked.extend(pair);
    }
    marked
}

/// `positions` without the joints [`find_joints_to_cleanup`] marks.
pub fn cleanup_positions(positions: &[Point]) -> Vec<Point> {
    let marked = find_joints_to_cleanup(positions);
    positions
        .iter()
        .enumerate()
        .filter(|(index, _)| !marked.contains(index))
        .map(|(_, &p)| p)
        .collect()
}

/// Scratch copy of a connection's joints during an insertion drag.
#[derive(Clone, Debug)]
pub struct DraftPath {
    connection: ConnectionId,
    path: OrthogonalPath,
    original: Vec<Point>,
    dragged: usize,
    source: Point,
    target: Point,
}

impl DraftPath {
    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn path(&self) -> &OrthogonalPath {
        &self.path
    }

    /// Joint positions captured at press time.
    pub fn original(&self) -> &[Point] {
        &self.original
    }

    /// Index of the joint bound to the cursor.
    pub fn dragged_index(&self) -> usize {
        self.dragged
    }

    pub fn points(&self) -> Vec<Point> {
        self.path.points(self.source, self.target)
    }
}

/// Click-drag-to-insert gesture on connection paths.
#[derive(Debug, Default)]
pub struct WaypointInserter {
    draft: Option<DraftPath>,
}

impl WaypointInserter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&DraftPath> {
        self.draft.as_ref()
    }

    /// Press on the rendered path of `connection`. Returns true if two
    /// temporary joints were inserted.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pressed(
        &mut self,
        model: &GraphModel,
        routing: &RoutingTable,
        skins: &dyn SkinLookup,
        properties: &EditorProperties,
        connection: ConnectionId,
        cursor: Point,
        button: PointerEventButton,
    ) -> bool {
        self.draft = None;
        if button != PointerEventButton::Left {
            return false;
        }

        let (Some(existing), Some(route)) = (model.connection(connection), routing.route(connection))
        else {
            warn!(%connection, "pressed connection vanished, insertion abandoned");
            return false;
        };
        let (Some(source), Some(target)) = (
            skins.connector_position(existing.source),
            skins.connector_position(existing.target),
        ) else {
            debug!(%connection, "connection endpoints have no geometry");
            return false;
        };

        let mut path = route.path.clone();
        let points = path.points(source, target);

        let offset = path_offset(&points, cursor);
        if offset > properties.path_hit_tolerance() {
            trace!(%connection, offset, "press missed the path");
            return false;
        }
        let Some(segment) = nearest_segment(&points, path.source_horizontal(), cursor) else {
            debug!(%connection, "no segment near press, insertion aborted");
            return false;
        };

        let anchor = points[segment];
        let split = round_point(if is_path_segment_horizontal(path.source_horizontal(), segment) {
            Point::new(cursor.x, anchor.y)
        } else {
            Point::new(anchor.x, cursor.y)
        });

        let original = path.joint_positions();
        path.insert_joints(segment, &[split, split]);
        debug!(%connection, segment, x = split.x, y = split.y, "temporary joints inserted");

        self.draft = Some(DraftPath {
            connection,
            path,
            original,
            dragged: segment + 1,
            source,
            target,
        });
        true
    }

    /// Move the cursor-bound joint.
    pub fn handle_dragged(&mut self, cursor: Point, grid: Option<f32>) {
        let Some(draft) = &mut self.draft else {
            return;
        };
        let proposed = match grid {
            Some(spacing) => snap_to_grid(cursor, spacing),
            None => cursor,
        };
        let position =
            draft
                .path
                .constrain_joint(draft.dragged, proposed, draft.source, draft.target, false, false);
        draft.path.set_joint_position(draft.dragged, position);
        trace!(connection = %draft.connection, x = position.x, y = position.y, "waypoint dragged");
    }

    /// Finish the gesture. Returns true if a joint replacement was committed.
    pub fn handle_released(&mut self, commands: &mut dyn CommandFacility) -> bool {
        let Some(draft) = self.draft.take() else {
            return false;
        };
        let Some(existing) = commands.model().connection(draft.connection) else {
            warn!(connection = %draft.connection, "connection vanished, insertion abandoned");
            return false;
        };
        let joint_type = existing
            .joints
            .first()
            .map(|joint| joint.joint_type.clone())
            .unwrap_or_else(|| "joint".to_string());

        let cleaned = cleanup_positions(&draft.path.joint_positions());
        if cleaned == draft.original {
            debug!(connection = %draft.connection, "waypoint drag left shape unchanged");
            return false;
        }

        match replace_joint_positions(commands, draft.connection, &joint_type, &cleaned) {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, connection = %draft.connection, "joint replacement failed");
                false
            }
        }
    }

    /// Drop the draft without committing.
    pub fn cancel(&mut self) {
        self.draft = None;
    }
}
