//! High-level controller for orthogonal connection editing.
//!
//! The [`GraphEditor`] owns the model's command stack, the routing arenas, the
//! gesture handlers and the path output, and exposes one entry point per
//! pointer event. Every commit re-syncs the routing arenas from the model.
//!
//! # Example
//!
//! ```ignore
//! use slint_orthogonal_links::GraphEditor;
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let editor = Rc::new(RefCell::new(GraphEditor::new(build_model())));
//!
//!     // Geometry tracking
//!     let tracker = editor.borrow().geometry_tracker();
//!     window.on_node_rect_changed(tracker.node_rect_callback());
//!     window.on_connector_position_changed(tracker.connector_position_callback());
//!
//!     // Path output
//!     let paths = Rc::new(VecModel::<ConnectionPath>::default());
//!     editor
//!         .borrow_mut()
//!         .paths_mut()
//!         .bind_model(paths.clone(), |id, commands| ConnectionPath { id, commands });
//!     window.set_connection_paths(ModelRc::from(paths));
//!
//!     window.on_connector_pressed({
//!         let editor = editor.clone();
//!         move |id| editor.borrow_mut().connector_pressed(ConnectorId(id), PointerEventButton::Left)
//!     });
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::alignment::JointDrag;
use crate::commands::{CommandFacility, CommandStack, EditCommand};
use crate::drag::{ConnectorDragManager, DragState};
use crate::error::Result;
use crate::geometry::Point;
use crate::graph::{ConnectionId, ConnectorId, GraphModel, JointId, NodeId};
use crate::intersections::{find_intersections, RoutedPath};
use crate::links::ConnectionPathManager;
use crate::orthogonal::RoutingTable;
use crate::path::polyline_commands;
use crate::properties::EditorProperties;
use crate::selection::SelectionManager;
use crate::state::{GeometryCache, SkinLookup};
use crate::tracking::GeometryTracker;
use crate::validation::{ConnectorStyle, ConnectorValidator, DefaultConnectorValidator};
use crate::waypoints::WaypointInserter;
use slint::platform::PointerEventButton;
use std::cell::Ref;
use tracing::debug;

/// One editor instance: model, routing state and gesture handlers.
///
/// Share it across Slint callbacks as `Rc<RefCell<GraphEditor>>`.
pub struct GraphEditor {
    commands: CommandStack,
    geometry: GeometryTracker,
    selection: SelectionManager,
    routing: RoutingTable,
    drag: ConnectorDragManager,
    waypoints: WaypointInserter,
    joint_drag: Option<JointDrag>,
    paths: ConnectionPathManager,
    properties: EditorProperties,
}

impl GraphEditor {
    /// Create an editor with the default connection policy.
    pub fn new(model: GraphModel) -> Self {
        Self::with_validator(model, Box::new(DefaultConnectorValidator::new()))
    }

    pub fn with_validator(model: GraphModel, validator: Box<dyn ConnectorValidator>) -> Self {
        let properties = EditorProperties::default();
        let geometry = GeometryTracker::new();
        geometry.cache().borrow_mut().sync_nodes(&model);

        let mut editor = Self {
            commands: CommandStack::new(model),
            geometry,
            selection: SelectionManager::new(),
            routing: RoutingTable::new(),
            drag: ConnectorDragManager::new(validator).with_minimum_stub(properties.minimum_stub),
            waypoints: WaypointInserter::new(),
            joint_drag: None,
            paths: ConnectionPathManager::new(),
            properties,
        };
        editor.routing.sync(editor.commands.model());
        editor
    }

    pub fn properties(&self) -> &EditorProperties {
        &self.properties
    }

    pub fn set_properties(&mut self, properties: EditorProperties) {
        self.drag.set_minimum_stub(properties.minimum_stub);
        self.properties = properties;
    }

    pub fn set_validator(&mut self, validator: Box<dyn ConnectorValidator>) {
        self.drag.set_validator(validator);
    }

    pub fn model(&self) -> &GraphModel {
        self.commands.model()
    }

    /// Direct access to the command stack, e.g. for history inspection.
    pub fn commands(&self) -> &CommandStack {
        &self.commands
    }

    /// Shared geometry cache and report callbacks.
    pub fn geometry_tracker(&self) -> GeometryTracker {
        self.geometry.clone()
    }

    pub fn geometry(&self) -> Ref<'_, GeometryCache> {
        self.geometry.cache_ref()
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionManager {
        &mut self.selection
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn paths(&self) -> &ConnectionPathManager {
        &self.paths
    }

    pub fn paths_mut(&mut self) -> &mut ConnectionPathManager {
        &mut self.paths
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn connector_style(&self, connector: ConnectorId) -> ConnectorStyle {
        self.drag.style(connector)
    }

    // === Commits ===

    /// Execute a command and re-sync routing.
    pub fn execute(&mut self, command: EditCommand) -> Result<()> {
        self.commands.execute(command)?;
        self.after_commit();
        Ok(())
    }

    /// Move a node through the command facility.
    pub fn move_node(&mut self, node: NodeId, position: Point) -> Result<()> {
        self.execute(EditCommand::MoveNode { node, position })
    }

    pub fn undo(&mut self) -> Result<bool> {
        let undone = self.commands.undo()?;
        if undone {
            self.after_commit();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool> {
        let redone = self.commands.redo()?;
        if redone {
            self.after_commit();
        }
        Ok(redone)
    }

    fn after_commit(&mut self) {
        let model = self.commands.model();
        self.geometry.cache().borrow_mut().sync_nodes(model);
        let rebound = self.routing.sync(model);
        debug!(rebound, history = self.commands.history_len(), "model committed");
    }

    // === Connector gestures ===

    /// Connector under `point`, if any.
    pub fn connector_at(&self, point: Point) -> Option<ConnectorId> {
        self.geometry()
            .find_connector_at(point, self.properties.connector_hit_radius)
    }

    pub fn connector_pressed(&mut self, connector: ConnectorId, button: PointerEventButton) {
        self.joint_drag_cancelled();
        self.drag.handle_pressed(connector, button);
    }

    pub fn connector_drag_detected(&mut self, cursor: Point) -> bool {
        let history = self.commands.history_len();
        let cache = self.geometry.cache();
        let started = self
            .drag
            .handle_drag_detected(&mut self.commands, &*cache.borrow(), cursor);
        if self.commands.history_len() != history {
            self.after_commit();
        }
        started
    }

    pub fn connector_dragged(&mut self, cursor: Point) {
        self.drag.handle_dragged(self.commands.model(), cursor);
    }

    pub fn connector_drag_entered(&mut self, target: ConnectorId) {
        let cache = self.geometry.cache();
        self.drag
            .handle_drag_entered(self.commands.model(), &*cache.borrow(), target);
    }

    pub fn connector_drag_exited(&mut self, target: ConnectorId, primary_down: bool) {
        self.drag
            .handle_drag_exited(self.commands.model(), target, primary_down);
    }

    /// Drag released over `target`, or over nothing.
    pub fn connector_drag_released(&mut self, target: Option<ConnectorId>) -> Option<ConnectionId> {
        let cache = self.geometry.cache();
        let created = self
            .drag
            .handle_drag_released(&mut self.commands, &*cache.borrow(), target);
        if created.is_some() {
            self.after_commit();
        }
        created
    }

    pub fn connector_mouse_released(&mut self, button: PointerEventButton) {
        self.drag.handle_mouse_released(button);
    }

    /// Current drag tail, source first.
    pub fn tail_points(&self) -> Option<Vec<Point>> {
        self.drag.state().tail().map(|tail| tail.points())
    }

    pub fn tail_path_commands(&self) -> Option<String> {
        self.tail_points().map(|points| polyline_commands(&points))
    }

    // === Path gestures ===

    /// Press on a connection's path; returns true if waypoints were inserted.
    pub fn path_pressed(&mut self, connection: ConnectionId, cursor: Point, button: PointerEventButton) -> bool {
        self.joint_drag_cancelled();
        let cache = self.geometry.cache();
        let cache = cache.borrow();
        self.waypoints.handle_pressed(
            self.commands.model(),
            &self.routing,
            &*cache,
            &self.properties,
            connection,
            cursor,
            button,
        )
    }

    pub fn path_dragged(&mut self, cursor: Point) {
        self.waypoints
            .handle_dragged(cursor, self.properties.active_grid());
    }

    /// Returns true if the connection's joints were replaced.
    pub fn path_released(&mut self) -> bool {
        let committed = self.waypoints.handle_released(&mut self.commands);
        if committed {
            self.after_commit();
        }
        committed
    }

    // === Joint gestures ===

    /// Press on a joint. Any joint drag in progress is rolled back first.
    pub fn joint_pressed(&mut self, joint: JointId, button: PointerEventButton) -> bool {
        self.joint_drag_cancelled();
        if button != PointerEventButton::Left {
            return false;
        }
        let cache = self.geometry.cache();
        self.joint_drag = JointDrag::begin(
            self.commands.model(),
            &self.routing,
            &*cache.borrow(),
            &self.selection,
            joint,
        );
        self.joint_drag.is_some()
    }

    pub fn joint_dragged(&mut self, cursor: Point) -> Option<Point> {
        let drag = self.joint_drag.as_ref()?;
        drag.drag_to(
            &mut self.routing,
            cursor,
            self.properties.alignment_threshold,
            self.properties.active_grid(),
        )
    }

    /// Returns true if a joint move was committed.
    pub fn joint_released(&mut self) -> bool {
        let Some(drag) = self.joint_drag.take() else {
            return false;
        };
        let committed = drag.finish(&self.routing, &mut self.commands);
        if committed {
            self.after_commit();
        }
        committed
    }

    /// Abandon the joint drag, restoring the live path from press time.
    pub fn joint_drag_cancelled(&mut self) {
        if let Some(drag) = self.joint_drag.take() {
            drag.cancel(&mut self.routing);
        }
    }

    // === Redraw ===

    /// Point sequences of all routable connections, in rendering order.
    ///
    /// A connection being split by a waypoint drag shows its draft.
    pub fn routed_paths(&self) -> Vec<RoutedPath> {
        let cache = self.geometry();
        let draft = self.waypoints.draft();

        self.commands
            .model()
            .connections()
            .iter()
            .filter_map(|connection| {
                let route = self.routing.route(connection.id)?;
                let points = match draft {
                    Some(draft) if draft.connection() == connection.id => draft.points(),
                    _ => route.path.points(
                        cache.connector_position(connection.source)?,
                        cache.connector_position(connection.target)?,
                    ),
                };
                Some(RoutedPath {
                    connection: connection.id,
                    points,
                    source_horizontal: route.path.source_horizontal(),
                })
            })
            .collect()
    }

    pub fn routed_points(&self, connection: ConnectionId) -> Option<Vec<Point>> {
        self.routed_paths()
            .into_iter()
            .find(|path| path.connection == connection)
            .map(|path| path.points)
    }

    /// Crossing offsets per segment of `connection`.
    pub fn intersections(&self, connection: ConnectionId, behind: bool) -> Vec<Vec<f32>> {
        let routed = self.routed_paths();
        routed
            .iter()
            .position(|path| path.connection == connection)
            .map(|index| find_intersections(index, &routed, behind))
            .unwrap_or_default()
    }

    /// Re-sync routing, snap drifted end joints back onto their connectors,
    /// and rebuild all path commands. Returns the corrected joints.
    pub fn redraw(&mut self) -> Vec<(ConnectionId, usize, Point)> {
        self.routing.sync(self.commands.model());

        let mut corrections = Vec::new();
        {
            let cache = self.geometry.cache();
            let cache = cache.borrow();
            for connection in self.commands.model().connections() {
                let (Some(source), Some(target)) = (
                    cache.connector_position(connection.source),
                    cache.connector_position(connection.target),
                ) else {
                    continue;
                };
                if let Some(route) = self.routing.route_mut(connection.id) {
                    corrections.extend(
                        route
                            .path
                            .align_endpoints(source, target)
                            .into_iter()
                            .map(|(index, point)| (connection.id, index, point)),
                    );
                }
            }
        }
        if !corrections.is_empty() {
            debug!(count = corrections.len(), "end joints realigned");
        }

        let routed = self.routed_paths();
        self.paths.update_paths(&routed, &self.properties);
        corrections
    }
}
