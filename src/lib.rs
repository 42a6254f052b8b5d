//! # Slint Orthogonal Links
//!
//! Interactive editing and routing of orthogonal (rectilinear) connections
//! between node connectors, for graph editors built with Slint.
//!
//! Connections leave a connector perpendicular to the node side it sits on and
//! then alternate strictly between horizontal and vertical segments. Users
//! create connections by dragging from a connector, bend them by dragging on a
//! path, and reshape them by dragging joints. Every persistent change goes
//! through an undoable command.
//!
//! ## Features
//!
//! - **Rectilinear by construction** - joints share axis cells, so moving one
//!   joint drags its neighbours along
//! - **Drag-to-connect** - live preview tails with validation feedback on hover
//! - **Waypoint insertion** - press on a path and drag out a new bend
//! - **Joint alignment** - dragged joints snap to neighbours, selected items and the grid
//! - **Crossing decoration** - gaps or half-circle detours where connections cross
//! - **Undo/redo** - atomic compound commands with automatic rollback
//!
//! ## Quick Start
//!
//! ```ignore
//! use slint_orthogonal_links::{GraphEditor, GraphModel, Rect};
//!
//! let mut model = GraphModel::new();
//! let a = model.add_node("default", Rect::new(0.0, 0.0, 100.0, 50.0));
//! let out = model.add_connector(a, "right-output")?;
//!
//! let editor = Rc::new(RefCell::new(GraphEditor::new(model)));
//! let tracker = editor.borrow().geometry_tracker();
//! window.on_connector_position_changed(tracker.connector_position_callback());
//! ```
//!
//! ## Core Types
//!
//! - [`GraphModel`] - nodes, connectors and connections in rendering order
//! - [`CommandStack`] - the [`CommandFacility`] that applies and undoes [`EditCommand`]s
//! - [`OrthogonalPath`] / [`RoutingTable`] - live axis arenas per connection
//! - [`ConnectorDragManager`] - the drag-to-connect state machine
//! - [`WaypointInserter`] / [`JointDrag`] - path and joint gestures
//! - [`ConnectionPathManager`] - SVG path output mirrored into a Slint model
//! - [`GraphEditor`] - ties all of the above together

pub mod alignment;
pub mod commands;
pub mod controller;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod hit_test;
pub mod intersections;
pub mod links;
pub mod orthogonal;
pub mod path;
pub mod properties;
pub mod selection;
pub mod state;
pub mod tail;
pub mod tracking;
pub mod validation;
pub mod waypoints;

pub use alignment::{alignment_targets, snap_position, AlignmentTargets, JointDrag};
pub use commands::{
    create_connection, replace_joint_positions, CommandFacility, CommandStack, EditCommand,
};
pub use controller::GraphEditor;
pub use drag::{ConnectorDragManager, DetachedConnection, DragState, TailDrag};
pub use error::{EditorError, Result};
pub use geometry::{
    check_in_range, check_intersection, round_point, round_to_grid_spacing, snap_to_grid, Point,
    Rect,
};
pub use graph::{
    Connection, ConnectionId, Connector, ConnectorId, GraphModel, Joint, JointId, Node, NodeId,
    Side,
};
pub use hit_test::{find_connector_at, nearest_segment, path_offset};
pub use intersections::{find_intersections, RoutedPath};
pub use links::ConnectionPathManager;
pub use orthogonal::{
    is_path_segment_horizontal, is_segment_horizontal, OrthogonalPath, RoutedConnection,
    RoutingTable,
};
pub use path::{orthogonal_path_commands, polyline_commands};
pub use properties::{CrossingStyle, EditorProperties};
pub use selection::{Selectable, SelectionManager, SelectionQuery};
pub use state::{GeometryCache, SkinLookup, StoredConnector};
pub use tail::{minimum_joint_count, Tail};
pub use tracking::GeometryTracker;
pub use validation::{
    ConnectorStyle, ConnectorValidator, DefaultConnectorValidator, ValidationError,
    ValidationResult,
};
pub use waypoints::{cleanup_positions, find_joints_to_cleanup, DraftPath, WaypointInserter};
