//! Test harness: a diagram builder plus helpers simulating pointer gestures.

#![allow(dead_code)]

use slint::platform::PointerEventButton;
use slint_orthogonal_links::{
    ConnectionId, ConnectorId, ConnectorValidator, GraphEditor, GraphModel, NodeId, Point, Rect,
    Side,
};

/// Builds a [`GraphModel`], then an editor over it with all connector
/// positions reported.
#[derive(Default)]
pub struct SceneBuilder {
    model: GraphModel,
}

impl SceneBuilder {
    pub fn new() -> Self {
        super::init_tracing();
        Self::default()
    }

    pub fn node(&mut self, x: f32, y: f32, width: f32, height: f32) -> NodeId {
        self.model.add_node("default", Rect::new(x, y, width, height))
    }

    /// Add a connector; its skin will sit at the middle of the named side.
    pub fn connector(&mut self, node: NodeId, connector_type: &str) -> ConnectorId {
        self.model
            .add_connector(node, connector_type)
            .expect("connector type must name a side")
    }

    pub fn model_mut(&mut self) -> &mut GraphModel {
        &mut self.model
    }

    pub fn build(self) -> GraphEditor {
        let editor = GraphEditor::new(self.model);
        report_connectors(&editor);
        editor
    }

    pub fn build_with_validator(self, validator: Box<dyn ConnectorValidator>) -> GraphEditor {
        let editor = GraphEditor::with_validator(self.model, validator);
        report_connectors(&editor);
        editor
    }
}

/// Report every connector at the middle of its side, relative to its node.
pub fn report_connectors(editor: &GraphEditor) {
    let report = editor.geometry_tracker().connector_position_callback();
    let model = editor.model();
    for connector in model.connectors() {
        let Some(node) = model.node(connector.node) else {
            continue;
        };
        let (rel_x, rel_y) = match connector.side {
            Side::Left => (0.0, node.height / 2.0),
            Side::Right => (node.width, node.height / 2.0),
            Side::Top => (node.width / 2.0, 0.0),
            Side::Bottom => (node.width / 2.0, node.height),
        };
        report(connector.id.0, node.id.0, rel_x, rel_y);
    }
}

/// Drag from `source` and release over `target`.
pub fn connect(
    editor: &mut GraphEditor,
    source: ConnectorId,
    target: ConnectorId,
) -> Option<ConnectionId> {
    let start = editor.geometry().absolute_connectors().find(|(id, _)| *id == source)?.1;
    editor.connector_pressed(source, PointerEventButton::Left);
    editor.connector_drag_detected(Point::new(start.x + 10.0, start.y + 10.0));
    editor.connector_drag_entered(target);
    editor.connector_drag_released(Some(target))
}

/// Press on a path, drag to `to`, release.
pub fn drag_waypoint(editor: &mut GraphEditor, connection: ConnectionId, from: Point, to: Point) -> bool {
    if !editor.path_pressed(connection, from, PointerEventButton::Left) {
        return false;
    }
    editor.path_dragged(to);
    editor.path_released()
}

/// The standard two-node scene: A's right output at (100, 25), B's left
/// input at (300, 125).
pub struct TwoNodes {
    pub editor: GraphEditor,
    pub a: NodeId,
    pub b: NodeId,
    pub out: ConnectorId,
    pub input: ConnectorId,
}

impl TwoNodes {
    pub fn new() -> Self {
        let mut scene = SceneBuilder::new();
        let a = scene.node(0.0, 0.0, 100.0, 50.0);
        let b = scene.node(300.0, 100.0, 100.0, 50.0);
        let out = scene.connector(a, "right-output");
        let input = scene.connector(b, "left-input");
        Self {
            editor: scene.build(),
            a,
            b,
            out,
            input,
        }
    }

    /// Connect A to B: joints (200, 25) and (200, 125).
    pub fn connected() -> (Self, ConnectionId) {
        let mut scene = Self::new();
        let id = connect(&mut scene.editor, scene.out, scene.input).expect("A to B is valid");
        (scene, id)
    }
}
