//! The persisted diagram model: nodes, connectors, connections and joints.
//!
//! After construction the model is only mutated by
//! [`EditCommand`](crate::commands::EditCommand)s applied through a
//! [`CommandFacility`](crate::commands::CommandFacility), which keeps every
//! change undoable. The `add_*` helpers exist for building a diagram before
//! editing starts.

use crate::error::{EditorError, Result};
use crate::geometry::{Point, Rect};
use std::collections::BTreeMap;
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub i32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`Node`].
    NodeId,
    "node"
);
define_id!(
    /// Identifier of a [`Connector`].
    ConnectorId,
    "connector"
);
define_id!(
    /// Identifier of a [`Connection`].
    ConnectionId,
    "connection"
);
define_id!(
    /// Identifier of a [`Joint`].
    JointId,
    "joint"
);

/// The side of its node a connector sits on.
///
/// Encoded in the connector's type string, e.g. `"left-input"` or
/// `"bottom-output"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Parse the side out of a connector type string.
    pub fn from_connector_type(connector_type: &str) -> Option<Side> {
        let lower = connector_type.to_ascii_lowercase();
        [
            ("left", Side::Left),
            ("right", Side::Right),
            ("top", Side::Top),
            ("bottom", Side::Bottom),
        ]
        .into_iter()
        .find(|(name, _)| lower.contains(name))
        .map(|(_, side)| side)
    }

    /// True if a path leaves a connector on this side horizontally.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    /// Sign of the direction a path leaves the connector in, along its axis.
    pub fn direction(self) -> f32 {
        match self {
            Side::Right | Side::Bottom => 1.0,
            Side::Left | Side::Top => -1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub node_type: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub connectors: Vec<ConnectorId>,
}

impl Node {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Connector {
    pub id: ConnectorId,
    pub connector_type: String,
    pub node: NodeId,
    pub side: Side,
    /// Connections currently attached, in attachment order.
    pub connections: Vec<ConnectionId>,
    /// When true, dragging an occupied connector detaches its connection
    /// instead of starting a new one.
    pub detach_on_drag: bool,
}

/// A routing waypoint owned by exactly one connection.
#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    pub id: JointId,
    pub joint_type: String,
    pub x: f32,
    pub y: f32,
    pub connection: ConnectionId,
}

impl Joint {
    pub fn new(id: JointId, joint_type: &str, position: Point, connection: ConnectionId) -> Self {
        Self {
            id,
            joint_type: joint_type.to_string(),
            x: position.x,
            y: position.y,
            connection,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub connection_type: String,
    pub source: ConnectorId,
    pub target: ConnectorId,
    /// Ordered from the source end to the target end.
    pub joints: Vec<Joint>,
}

impl Connection {
    pub fn new(
        id: ConnectionId,
        connection_type: &str,
        source: ConnectorId,
        target: ConnectorId,
    ) -> Self {
        Self {
            id,
            connection_type: connection_type.to_string(),
            source,
            target,
            joints: Vec::new(),
        }
    }

    pub fn joint_positions(&self) -> Vec<Point> {
        self.joints.iter().map(Joint::position).collect()
    }

    pub fn joint_ids(&self) -> Vec<JointId> {
        self.joints.iter().map(|joint| joint.id).collect()
    }

    /// The connector at the other end from `connector`, if it is attached.
    pub fn opposite(&self, connector: ConnectorId) -> Option<ConnectorId> {
        if connector == self.source {
            Some(self.target)
        } else if connector == self.target {
            Some(self.source)
        } else {
            None
        }
    }
}

/// The diagram: nodes with their connectors, and connections in rendering
/// (z-)order. A connection earlier in the list is drawn behind later ones.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
    nodes: BTreeMap<NodeId, Node>,
    connectors: BTreeMap<ConnectorId, Connector>,
    connections: Vec<Connection>,
    next_id: i32,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh id, unique across all entity kinds.
    pub fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_node(&mut self, node_type: &str, rect: Rect) -> NodeId {
        let id = NodeId(self.allocate_id());
        self.nodes.insert(
            id,
            Node {
                id,
                node_type: node_type.to_string(),
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                connectors: Vec::new(),
            },
        );
        id
    }

    /// Add a connector to `node`. The type string must name a side.
    pub fn add_connector(&mut self, node: NodeId, connector_type: &str) -> Result<ConnectorId> {
        let side = Side::from_connector_type(connector_type)
            .ok_or_else(|| EditorError::UnknownSide(connector_type.to_string()))?;
        if !self.nodes.contains_key(&node) {
            return Err(EditorError::NodeNotFound(node));
        }
        let id = ConnectorId(self.allocate_id());
        self.connectors.insert(
            id,
            Connector {
                id,
                connector_type: connector_type.to_string(),
                node,
                side,
                connections: Vec::new(),
                detach_on_drag: true,
            },
        );
        if let Some(owner) = self.nodes.get_mut(&node) {
            owner.connectors.push(id);
        }
        Ok(id)
    }

    pub fn set_detach_on_drag(&mut self, connector: ConnectorId, detach: bool) -> Result<()> {
        let connector = self
            .connectors
            .get_mut(&connector)
            .ok_or(EditorError::ConnectorNotFound(connector))?;
        connector.detach_on_drag = detach;
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(&id)
    }

    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.values()
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// All connections in rendering order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Position of the connection in the rendering list.
    pub fn connection_index(&self, id: ConnectionId) -> Option<usize> {
        self.connections.iter().position(|c| c.id == id)
    }

    /// Side of the source connector, which fixes the connection's segment parity.
    pub fn source_side(&self, connection: &Connection) -> Option<Side> {
        self.connector(connection.source).map(|c| c.side)
    }

    /// Owning node of a connector.
    pub fn node_of(&self, connector: ConnectorId) -> Option<NodeId> {
        self.connector(connector).map(|c| c.node)
    }

    /// Check if a connection with the given direction already exists.
    pub fn connection_exists(&self, source: ConnectorId, target: ConnectorId) -> bool {
        self.connections
            .iter()
            .any(|c| c.source == source && c.target == target)
    }

    /// Find all connections with an end on a connector of `node`.
    pub fn connections_of_node(&self, node: NodeId) -> Vec<ConnectionId> {
        self.connections
            .iter()
            .filter(|c| self.node_of(c.source) == Some(node) || self.node_of(c.target) == Some(node))
            .map(|c| c.id)
            .collect()
    }

    // === Mutations (applied by commands) ===

    pub(crate) fn insert_connection(
        &mut self,
        index: Option<usize>,
        mut connection: Connection,
    ) -> Result<()> {
        if self.connection(connection.id).is_some() {
            return Err(EditorError::DuplicateConnection(connection.id));
        }
        if connection.source == connection.target {
            return Err(EditorError::SelfConnection(connection.source));
        }
        for end in [connection.source, connection.target] {
            if !self.connectors.contains_key(&end) {
                return Err(EditorError::ConnectorNotFound(end));
            }
        }
        for joint in &mut connection.joints {
            joint.connection = connection.id;
        }
        for end in [connection.source, connection.target] {
            if let Some(connector) = self.connectors.get_mut(&end) {
                connector.connections.push(connection.id);
            }
        }
        let index = index.unwrap_or(self.connections.len()).min(self.connections.len());
        self.connections.insert(index, connection);
        Ok(())
    }

    pub(crate) fn remove_connection(&mut self, id: ConnectionId) -> Result<(usize, Connection)> {
        let index = self
            .connection_index(id)
            .ok_or(EditorError::ConnectionNotFound(id))?;
        let connection = self.connections.remove(index);
        for end in [connection.source, connection.target] {
            if let Some(connector) = self.connectors.get_mut(&end) {
                connector.connections.retain(|&c| c != id);
            }
        }
        Ok((index, connection))
    }

    fn connection_mut(&mut self, id: ConnectionId) -> Result<&mut Connection> {
        self.connections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(EditorError::ConnectionNotFound(id))
    }

    pub(crate) fn insert_joint(
        &mut self,
        connection: ConnectionId,
        index: Option<usize>,
        mut joint: Joint,
    ) -> Result<()> {
        let owner = self.connection_mut(connection)?;
        let index = index.unwrap_or(owner.joints.len());
        if index > owner.joints.len() {
            return Err(EditorError::JointIndexOutOfRange { connection, index });
        }
        joint.connection = connection;
        owner.joints.insert(index, joint);
        Ok(())
    }

    pub(crate) fn remove_joint(
        &mut self,
        connection: ConnectionId,
        joint: JointId,
    ) -> Result<(usize, Joint)> {
        let owner = self.connection_mut(connection)?;
        let index = owner
            .joints
            .iter()
            .position(|j| j.id == joint)
            .ok_or(EditorError::JointNotFound { connection, joint })?;
        Ok((index, owner.joints.remove(index)))
    }

    pub(crate) fn remove_all_joints(&mut self, connection: ConnectionId) -> Result<Vec<Joint>> {
        let owner = self.connection_mut(connection)?;
        Ok(std::mem::take(&mut owner.joints))
    }

    /// Move joints, returning their previous positions. Nothing moves unless
    /// every joint id is found.
    pub(crate) fn move_joints(
        &mut self,
        connection: ConnectionId,
        positions: &[(JointId, Point)],
    ) -> Result<Vec<(JointId, Point)>> {
        let owner = self.connection_mut(connection)?;
        if let Some(&(missing, _)) = positions
            .iter()
            .find(|(id, _)| !owner.joints.iter().any(|j| j.id == *id))
        {
            return Err(EditorError::JointNotFound {
                connection,
                joint: missing,
            });
        }
        let mut previous = Vec::with_capacity(positions.len());
        for &(id, position) in positions {
            if let Some(joint) = owner.joints.iter_mut().find(|j| j.id == id) {
                previous.push((id, joint.position()));
                joint.x = position.x;
                joint.y = position.y;
            }
        }
        Ok(previous)
    }

    pub(crate) fn move_node(&mut self, node: NodeId, position: Point) -> Result<Point> {
        let node = self
            .nodes
            .get_mut(&node)
            .ok_or(EditorError::NodeNotFound(node))?;
        let previous = Point::new(node.x, node.y);
        node.x = position.x;
        node.y = position.y;
        Ok(previous)
    }
}
