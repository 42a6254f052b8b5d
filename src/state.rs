use std::collections::HashMap;

use crate::geometry::{Point, Rect};
use crate::graph::{ConnectorId, GraphModel, NodeId};
use crate::hit_test::find_connector_at;

/// Read-only view of where skins currently are.
///
/// The routing core treats this as ground truth for node and connector
/// positions. Joint positions live in the routing arenas instead.
pub trait SkinLookup {
    fn node_rect(&self, node: NodeId) -> Option<Rect>;
    fn connector_position(&self, connector: ConnectorId) -> Option<Point>;
}

/// A connector position as reported by its skin, relative to the owning node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoredConnector {
    pub node_id: NodeId,
    pub rel_x: f32,
    pub rel_y: f32,
}

/// Helper struct to manage spatial state of the editor (node rects and
/// connector offsets)
#[derive(Clone, Debug, Default)]
pub struct GeometryCache {
    pub node_rects: HashMap<NodeId, Rect>,
    pub connector_positions: HashMap<ConnectorId, StoredConnector>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update a node's rectangle
    pub fn update_node_rect(&mut self, id: NodeId, x: f32, y: f32, width: f32, height: f32) {
        self.node_rects.insert(id, Rect::new(x, y, width, height));
    }

    /// Standard handler for connector position reports from skins
    pub fn handle_connector_report(
        &mut self,
        connector_id: ConnectorId,
        node_id: NodeId,
        rel_x: f32,
        rel_y: f32,
    ) {
        self.connector_positions.insert(
            connector_id,
            StoredConnector {
                node_id,
                rel_x,
                rel_y,
            },
        );
    }

    /// Mirror node rectangles from the model, e.g. after a node move was
    /// committed or undone.
    pub fn sync_nodes(&mut self, model: &GraphModel) {
        self.node_rects.retain(|id, _| model.node(*id).is_some());
        for node in model.nodes() {
            self.node_rects.insert(node.id, node.rect());
        }
    }

    /// Iterator over absolute connector positions for hit testing
    pub fn absolute_connectors(&self) -> impl Iterator<Item = (ConnectorId, Point)> + '_ {
        self.connector_positions
            .iter()
            .filter_map(move |(&id, stored)| {
                let rect = self.node_rects.get(&stored.node_id)?;
                Some((id, Point::new(rect.x + stored.rel_x, rect.y + stored.rel_y)))
            })
    }

    /// Find the connector at `point`
    pub fn find_connector_at(&self, point: Point, hit_radius: f32) -> Option<ConnectorId> {
        find_connector_at(point, self.absolute_connectors(), hit_radius)
    }
}

impl SkinLookup for GeometryCache {
    fn node_rect(&self, node: NodeId) -> Option<Rect> {
        self.node_rects.get(&node).copied()
    }

    fn connector_position(&self, connector: ConnectorId) -> Option<Point> {
        let stored = self.connector_positions.get(&connector)?;
        let rect = self.node_rects.get(&stored.node_id)?;
        Some(Point::new(rect.x + stored.rel_x, rect.y + stored.rel_y))
    }
}
