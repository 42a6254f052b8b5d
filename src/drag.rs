//! Connector drag state machine.
//!
//! Turns pointer gestures on connectors into new connections, detached and
//! re-attached connections, and hover feedback. The state is one tagged value
//! owned by [`ConnectorDragManager`] and only changes inside its `handle_*`
//! methods.
//!
//! Handlers never fail towards the host: a rejected or vanished target ends
//! the gesture quietly and the machine returns to [`DragState::Idle`].

use std::collections::HashMap;

use slint::platform::PointerEventButton;
use tracing::{debug, trace, warn};

use crate::commands::{create_connection, CommandFacility, EditCommand};
use crate::geometry::Point;
use crate::graph::{ConnectionId, ConnectorId, GraphModel};
use crate::state::SkinLookup;
use crate::tail::Tail;
use crate::validation::{ConnectorStyle, ConnectorValidator};

/// The connection removed when a drag started on an occupied connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetachedConnection {
    pub connection: ConnectionId,
    /// The connector the user pressed, i.e. the end that was pulled off.
    pub grabbed: ConnectorId,
}

/// A tail being dragged, with its origin.
#[derive(Clone, Debug, PartialEq)]
pub struct TailDrag {
    pub tail: Tail,
    pub detached: Option<DetachedConnection>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    CreatingTail(TailDrag),
    DetachingTail(TailDrag),
    HoveringValid { drag: TailDrag, target: ConnectorId },
    HoveringInvalid { drag: TailDrag, target: ConnectorId },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    pub fn drag(&self) -> Option<&TailDrag> {
        match self {
            DragState::Idle => None,
            DragState::CreatingTail(drag)
            | DragState::DetachingTail(drag)
            | DragState::HoveringValid { drag, .. }
            | DragState::HoveringInvalid { drag, .. } => Some(drag),
        }
    }

    fn drag_mut(&mut self) -> Option<&mut TailDrag> {
        match self {
            DragState::Idle => None,
            DragState::CreatingTail(drag)
            | DragState::DetachingTail(drag)
            | DragState::HoveringValid { drag, .. }
            | DragState::HoveringInvalid { drag, .. } => Some(drag),
        }
    }

    fn into_drag(self) -> Option<TailDrag> {
        match self {
            DragState::Idle => None,
            DragState::CreatingTail(drag)
            | DragState::DetachingTail(drag)
            | DragState::HoveringValid { drag, .. }
            | DragState::HoveringInvalid { drag, .. } => Some(drag),
        }
    }

    /// Back to following the cursor.
    fn unhovered(drag: TailDrag) -> DragState {
        if drag.detached.is_some() {
            DragState::DetachingTail(drag)
        } else {
            DragState::CreatingTail(drag)
        }
    }

    pub fn tail(&self) -> Option<&Tail> {
        self.drag().map(|drag| &drag.tail)
    }

    /// The connector currently hovered with prevalidation passed.
    pub fn hovered(&self) -> Option<ConnectorId> {
        match self {
            DragState::HoveringValid { target, .. } | DragState::HoveringInvalid { target, .. } => {
                Some(*target)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DragState::Idle => "idle",
            DragState::CreatingTail(_) => "creating-tail",
            DragState::DetachingTail(_) => "detaching-tail",
            DragState::HoveringValid { .. } => "hovering-valid",
            DragState::HoveringInvalid { .. } => "hovering-invalid",
        }
    }
}

/// Owns the drag state of one editor instance.
pub struct ConnectorDragManager {
    validator: Box<dyn ConnectorValidator>,
    state: DragState,
    pressed: Option<ConnectorId>,
    reposition_allowed: bool,
    styles: HashMap<ConnectorId, ConnectorStyle>,
    minimum_stub: f32,
}

impl ConnectorDragManager {
    pub fn new(validator: Box<dyn ConnectorValidator>) -> Self {
        Self {
            validator,
            state: DragState::Idle,
            pressed: None,
            reposition_allowed: true,
            styles: HashMap::new(),
            minimum_stub: 20.0,
        }
    }

    pub fn with_minimum_stub(mut self, stub: f32) -> Self {
        self.minimum_stub = stub;
        self
    }

    pub fn set_minimum_stub(&mut self, stub: f32) {
        self.minimum_stub = stub;
    }

    pub fn set_validator(&mut self, validator: Box<dyn ConnectorValidator>) {
        self.validator = validator;
    }

    pub fn validator(&self) -> &dyn ConnectorValidator {
        self.validator.as_ref()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// False while a prevalidated connector is hovered: the tail end stays on it.
    pub fn reposition_allowed(&self) -> bool {
        self.reposition_allowed
    }

    pub fn style(&self, connector: ConnectorId) -> ConnectorStyle {
        self.styles.get(&connector).copied().unwrap_or_default()
    }

    /// Connectors currently showing a non-default style.
    pub fn styled_connectors(&self) -> impl Iterator<Item = (ConnectorId, ConnectorStyle)> + '_ {
        self.styles.iter().map(|(&id, &style)| (id, style))
    }

    fn transition(&mut self, state: DragState) {
        debug!(from = self.state.name(), to = state.name(), "drag state");
        self.state = state;
    }

    fn reset(&mut self) {
        if !self.state.is_idle() {
            self.transition(DragState::Idle);
        }
        self.pressed = None;
        self.reposition_allowed = true;
        self.styles.clear();
    }

    fn abandon(&mut self, connector: ConnectorId, what: &str) {
        warn!(%connector, "{what} vanished, gesture abandoned");
        self.reset();
    }

    /// Pointer pressed on `connector`. Non-primary buttons end any gesture.
    pub fn handle_pressed(&mut self, connector: ConnectorId, button: PointerEventButton) {
        self.reset();
        if button != PointerEventButton::Left {
            return;
        }
        self.pressed = Some(connector);
    }

    /// The pressed connector started moving. Returns true if a tail exists now.
    pub fn handle_drag_detected(
        &mut self,
        commands: &mut dyn CommandFacility,
        skins: &dyn SkinLookup,
        cursor: Point,
    ) -> bool {
        let Some(pressed) = self.pressed else {
            return false;
        };
        if !self.state.is_idle() {
            return false;
        }

        let model = commands.model();
        let Some(connector) = model.connector(pressed) else {
            self.abandon(pressed, "pressed connector");
            return false;
        };

        if connector.connections.is_empty() || !connector.detach_on_drag {
            let side = connector.side;
            let Some(position) = skins.connector_position(pressed) else {
                self.abandon(pressed, "pressed connector geometry");
                return false;
            };
            let mut tail = Tail::new(pressed, position, side, self.minimum_stub);
            tail.update_end(cursor, None);
            self.transition(DragState::CreatingTail(TailDrag {
                tail,
                detached: None,
            }));
            return true;
        }

        let connection_id = connector.connections[0];
        let Some(connection) = model.connection(connection_id) else {
            warn!(connection = %connection_id, "attached connection vanished, gesture abandoned");
            self.reset();
            return false;
        };
        let Some(new_source) = connection.opposite(pressed) else {
            self.abandon(pressed, "connection end");
            return false;
        };
        let mut joints = connection.joint_positions();
        if connection.source == pressed {
            joints.reverse();
        }

        if let Err(err) = commands.execute(EditCommand::RemoveConnection(connection_id)) {
            debug!(%err, connection = %connection_id, "detach failed");
            self.reset();
            return false;
        }
        debug!(connection = %connection_id, grabbed = %pressed, "connection detached");

        // The commit may have rebuilt everything; look the source up again
        let Some(side) = commands.model().connector(new_source).map(|c| c.side) else {
            self.abandon(new_source, "tail source");
            return false;
        };
        let Some(position) = skins.connector_position(new_source) else {
            self.abandon(new_source, "tail source geometry");
            return false;
        };

        let mut tail =
            Tail::new(new_source, position, side, self.minimum_stub).with_preserved_joints(joints);
        tail.update_end(cursor, None);
        self.transition(DragState::DetachingTail(TailDrag {
            tail,
            detached: Some(DetachedConnection {
                connection: connection_id,
                grabbed: pressed,
            }),
        }));
        true
    }

    /// Cursor moved during a gesture.
    pub fn handle_dragged(&mut self, model: &GraphModel, cursor: Point) {
        let Some(source) = self.state.tail().map(Tail::source) else {
            return;
        };
        if model.connector(source).is_none() {
            self.abandon(source, "tail source");
            return;
        }

        if let Some(target) = self.state.hovered() {
            if model.connector(target).is_none() {
                debug!(%target, "hovered connector vanished");
                self.styles.remove(&target);
                self.reposition_allowed = true;
                if let Some(drag) = std::mem::take(&mut self.state).into_drag() {
                    self.transition(DragState::unhovered(drag));
                }
            }
        }

        if self.reposition_allowed {
            if let Some(drag) = self.state.drag_mut() {
                drag.tail.update_end(cursor, None);
            }
        }
    }

    /// The dragged tail entered `target`.
    pub fn handle_drag_entered(
        &mut self,
        model: &GraphModel,
        skins: &dyn SkinLookup,
        target: ConnectorId,
    ) {
        let source = match &self.state {
            DragState::CreatingTail(drag) | DragState::DetachingTail(drag) => drag.tail.source(),
            _ => return,
        };
        if model.connector(source).is_none() {
            self.abandon(source, "tail source");
            return;
        }
        let Some(target_side) = model.connector(target).map(|c| c.side) else {
            debug!(%target, "entered unknown connector");
            return;
        };
        if !self.validator.prevalidate(model, source, target) {
            trace!(%source, %target, "connector inert for this gesture");
            return;
        }

        self.reposition_allowed = false;
        let valid = self.validator.validate(model, source, target);
        self.styles.insert(
            target,
            if valid {
                ConnectorStyle::Allowed
            } else {
                ConnectorStyle::Forbidden
            },
        );

        let Some(mut drag) = std::mem::take(&mut self.state).into_drag() else {
            return;
        };
        if valid {
            if let Some(position) = skins.connector_position(target) {
                drag.tail.update_end(position, Some(target_side));
            }
            self.transition(DragState::HoveringValid { drag, target });
        } else {
            self.transition(DragState::HoveringInvalid { drag, target });
        }
    }

    /// The dragged tail left `target`.
    pub fn handle_drag_exited(&mut self, model: &GraphModel, target: ConnectorId, primary_down: bool) {
        if self.state.hovered() != Some(target) || !primary_down {
            return;
        }
        let Some(source) = self.state.tail().map(Tail::source) else {
            return;
        };
        if !self.validator.prevalidate(model, source, target) {
            return;
        }

        self.styles.remove(&target);
        self.reposition_allowed = true;
        if let Some(drag) = std::mem::take(&mut self.state).into_drag() {
            self.transition(DragState::unhovered(drag));
        }
    }

    /// Drag released, over `target` or over nothing. Returns the new
    /// connection if one was committed.
    pub fn handle_drag_released(
        &mut self,
        commands: &mut dyn CommandFacility,
        skins: &dyn SkinLookup,
        target: Option<ConnectorId>,
    ) -> Option<ConnectionId> {
        let drag = std::mem::take(&mut self.state).into_drag();
        let created = match (drag, target) {
            (Some(drag), Some(target)) => self.commit(commands, skins, drag, target),
            (Some(drag), None) => {
                debug!(source = %drag.tail.source(), "tail discarded");
                None
            }
            (None, _) => None,
        };
        self.reset();
        created
    }

    fn commit(
        &self,
        commands: &mut dyn CommandFacility,
        skins: &dyn SkinLookup,
        mut drag: TailDrag,
        target: ConnectorId,
    ) -> Option<ConnectionId> {
        let model = commands.model();
        let source = drag.tail.source();
        if model.connector(source).is_none() {
            warn!(%source, "tail source vanished, gesture abandoned");
            return None;
        }
        let Some(target_side) = model.connector(target).map(|c| c.side) else {
            warn!(%target, "release target vanished, gesture abandoned");
            return None;
        };
        if !(self.validator.prevalidate(model, source, target)
            && self.validator.validate(model, source, target))
        {
            debug!(%source, %target, "released over rejected connector");
            return None;
        }

        if let Some(position) = skins.connector_position(target) {
            drag.tail.update_end(position, Some(target_side));
        }
        let joints = drag.tail.allocate_joint_positions();
        let connection_type = self.validator.create_connection_type(model, source, target);
        let joint_type = self.validator.create_joint_type(model, source, target);

        match create_connection(commands, source, target, &connection_type, &joint_type, &joints) {
            Ok(id) => Some(id),
            Err(err) => {
                debug!(%err, %source, %target, "connection not created");
                None
            }
        }
    }

    /// Mouse released outside of any drag target.
    pub fn handle_mouse_released(&mut self, button: PointerEventButton) {
        if button != PointerEventButton::Left {
            return;
        }
        if let Some(tail) = self.state.tail() {
            debug!(source = %tail.source(), "gesture cancelled");
        }
        self.reset();
    }

    /// End any gesture without committing.
    pub fn cancel(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandStack;
    use crate::geometry::Rect;
    use crate::state::GeometryCache;
    use crate::validation::DefaultConnectorValidator;

    struct Fixture {
        commands: CommandStack,
        cache: GeometryCache,
        manager: ConnectorDragManager,
        a_out: ConnectorId,
        a_in: ConnectorId,
        b_in: ConnectorId,
    }

    fn fixture() -> Fixture {
        let mut model = GraphModel::new();
        let a = model.add_node("default", Rect::new(0.0, 0.0, 100.0, 50.0));
        let b = model.add_node("default", Rect::new(300.0, 100.0, 100.0, 50.0));
        let a_out = model.add_connector(a, "right-output").unwrap();
        let a_in = model.add_connector(a, "left-input").unwrap();
        let b_in = model.add_connector(b, "left-input").unwrap();

        let mut cache = GeometryCache::new();
        cache.sync_nodes(&model);
        cache.handle_connector_report(a_out, a, 100.0, 25.0);
        cache.handle_connector_report(a_in, a, 0.0, 25.0);
        cache.handle_connector_report(b_in, b, 0.0, 25.0);

        Fixture {
            commands: CommandStack::new(model),
            cache,
            manager: ConnectorDragManager::new(Box::new(DefaultConnectorValidator::new())),
            a_out,
            a_in,
            b_in,
        }
    }

    fn z_joints() -> Vec<Point> {
        vec![Point::new(200.0, 25.0), Point::new(200.0, 125.0)]
    }

    impl Fixture {
        fn start_drag(&mut self, connector: ConnectorId) -> bool {
            self.manager.handle_pressed(connector, PointerEventButton::Left);
            self.manager
                .handle_drag_detected(&mut self.commands, &self.cache, Point::new(150.0, 40.0))
        }
    }

    // ========================================================================
    // Creating a connection
    // ========================================================================

    #[test]
    fn test_drag_from_free_connector_creates_tail() {
        let mut f = fixture();
        assert!(f.start_drag(f.a_out));

        let DragState::CreatingTail(drag) = f.manager.state() else {
            panic!("expected creating tail, got {:?}", f.manager.state());
        };
        assert_eq!(drag.tail.source(), f.a_out);
        assert_eq!(drag.tail.source_position(), Point::new(100.0, 25.0));
        assert_eq!(drag.tail.end(), Point::new(150.0, 40.0));
        assert_eq!(f.commands.history_len(), 0);
    }

    #[test]
    fn test_drag_create_commits_tail_joints() {
        let mut f = fixture();
        f.start_drag(f.a_out);
        f.manager.handle_dragged(f.commands.model(), Point::new(250.0, 100.0));
        f.manager.handle_drag_entered(f.commands.model(), &f.cache, f.b_in);

        assert!(matches!(f.manager.state(), DragState::HoveringValid { target, .. } if *target == f.b_in));
        assert_eq!(f.manager.style(f.b_in), ConnectorStyle::Allowed);
        assert!(!f.manager.reposition_allowed());

        let expected = f.manager.state().tail().unwrap().allocate_joint_positions();
        let id = f
            .manager
            .handle_drag_released(&mut f.commands, &f.cache, Some(f.b_in))
            .unwrap();

        let connection = f.commands.model().connection(id).unwrap();
        assert_eq!(connection.source, f.a_out);
        assert_eq!(connection.target, f.b_in);
        assert_eq!(connection.connection_type, "orthogonal");
        assert_eq!(connection.joint_positions(), expected);
        assert_eq!(connection.joint_positions(), z_joints());
        assert_eq!(f.commands.model().connections().len(), 1);
        assert_eq!(f.commands.history_len(), 1);
        assert!(f.manager.state().is_idle());
        assert_eq!(f.manager.style(f.b_in), ConnectorStyle::Default);
    }

    #[test]
    fn test_tail_end_locked_while_hovering() {
        let mut f = fixture();
        f.start_drag(f.a_out);
        f.manager.handle_drag_entered(f.commands.model(), &f.cache, f.b_in);
        f.manager.handle_dragged(f.commands.model(), Point::new(500.0, 500.0));

        assert_eq!(f.manager.state().tail().unwrap().end(), Point::new(300.0, 125.0));
    }

    #[test]
    fn test_prevalidate_false_leaves_connector_inert() {
        let mut f = fixture();
        f.start_drag(f.a_out);
        // Same node
        f.manager.handle_drag_entered(f.commands.model(), &f.cache, f.a_in);

        assert!(matches!(f.manager.state(), DragState::CreatingTail(_)));
        assert_eq!(f.manager.style(f.a_in), ConnectorStyle::Default);
        assert!(f.manager.reposition_allowed());

        assert_eq!(f.manager.handle_drag_released(&mut f.commands, &f.cache, Some(f.a_in)), None);
        assert!(f.commands.model().connections().is_empty());
    }

    #[test]
    fn test_invalid_target_is_flagged_and_not_committed() {
        let mut f = fixture();
        create_connection(&mut f.commands, f.a_out, f.b_in, "orthogonal", "joint", &z_joints()).unwrap();
        f.commands.model_mut().set_detach_on_drag(f.a_out, false).unwrap();

        f.start_drag(f.a_out);
        f.manager.handle_drag_entered(f.commands.model(), &f.cache, f.b_in);
        assert!(matches!(f.manager.state(), DragState::HoveringInvalid { .. }));
        assert_eq!(f.manager.style(f.b_in), ConnectorStyle::Forbidden);

        assert_eq!(f.manager.handle_drag_released(&mut f.commands, &f.cache, Some(f.b_in)), None);
        assert_eq!(f.commands.model().connections().len(), 1);
        assert_eq!(f.commands.history_len(), 1);
    }

    #[test]
    fn test_exit_restores_style_and_reposition() {
        let mut f = fixture();
        f.start_drag(f.a_out);
        f.manager.handle_drag_entered(f.commands.model(), &f.cache, f.b_in);
        f.manager.handle_drag_exited(f.commands.model(), f.b_in, true);

        assert!(matches!(f.manager.state(), DragState::CreatingTail(_)));
        assert_eq!(f.manager.style(f.b_in), ConnectorStyle::Default);
        assert!(f.manager.reposition_allowed());

        f.manager.handle_dragged(f.commands.model(), Point::new(220.0, 60.0));
        assert_eq!(f.manager.state().tail().unwrap().end(), Point::new(220.0, 60.0));
    }

    #[test]
    fn test_exit_without_primary_button_keeps_hover() {
        let mut f = fixture();
        f.start_drag(f.a_out);
        f.manager.handle_drag_entered(f.commands.model(), &f.cache, f.b_in);
        f.manager.handle_drag_exited(f.commands.model(), f.b_in, false);
        assert_eq!(f.manager.state().hovered(), Some(f.b_in));
    }

    #[test]
    fn test_release_over_nothing_discards_tail() {
        let mut f = fixture();
        f.start_drag(f.a_out);
        assert_eq!(f.manager.handle_drag_released(&mut f.commands, &f.cache, None), None);
        assert!(f.manager.state().is_idle());
        assert_eq!(f.commands.history_len(), 0);
    }

    // ========================================================================
    // Detaching a connection
    // ========================================================================

    #[test]
    fn test_detach_from_source_end_reverses_joints() {
        let mut f = fixture();
        let id = create_connection(&mut f.commands, f.a_out, f.b_in, "orthogonal", "joint", &z_joints()).unwrap();

        assert!(f.start_drag(f.a_out));

        let DragState::DetachingTail(drag) = f.manager.state() else {
            panic!("expected detaching tail, got {:?}", f.manager.state());
        };
        assert_eq!(drag.tail.source(), f.b_in);
        assert_eq!(
            drag.detached,
            Some(DetachedConnection {
                connection: id,
                grabbed: f.a_out
            })
        );
        let mut reversed = z_joints();
        reversed.reverse();
        assert_eq!(drag.tail.preserved_joints(), Some(reversed.as_slice()));

        // Removed exactly once
        assert!(f.commands.model().connection(id).is_none());
        assert_eq!(f.commands.history_len(), 2);
    }

    #[test]
    fn test_detach_from_target_end_keeps_joint_order() {
        let mut f = fixture();
        create_connection(&mut f.commands, f.a_out, f.b_in, "orthogonal", "joint", &z_joints()).unwrap();

        f.start_drag(f.b_in);
        let tail = f.manager.state().tail().unwrap();
        assert_eq!(tail.source(), f.a_out);
        assert_eq!(tail.preserved_joints(), Some(z_joints().as_slice()));
    }

    #[test]
    fn test_cancelled_detach_does_not_recreate_connection() {
        let mut f = fixture();
        create_connection(&mut f.commands, f.a_out, f.b_in, "orthogonal", "joint", &z_joints()).unwrap();

        f.start_drag(f.a_out);
        f.manager.handle_mouse_released(PointerEventButton::Left);

        assert!(f.manager.state().is_idle());
        assert!(f.commands.model().connections().is_empty());

        // The removal itself is undoable
        f.commands.undo().unwrap();
        assert_eq!(f.commands.model().connections().len(), 1);
    }

    #[test]
    fn test_detach_and_reattach() {
        let mut f = fixture();
        create_connection(&mut f.commands, f.a_out, f.b_in, "orthogonal", "joint", &z_joints()).unwrap();

        // Pull the target end off and drop it back on
        f.start_drag(f.b_in);
        f.manager.handle_drag_entered(f.commands.model(), &f.cache, f.b_in);
        let id = f
            .manager
            .handle_drag_released(&mut f.commands, &f.cache, Some(f.b_in))
            .unwrap();

        let connection = f.commands.model().connection(id).unwrap();
        assert_eq!((connection.source, connection.target), (f.a_out, f.b_in));
        assert_eq!(connection.joint_positions(), z_joints());
        assert_eq!(f.commands.history_len(), 3);
    }

    #[test]
    fn test_detach_disabled_starts_additional_connection() {
        let mut f = fixture();
        create_connection(&mut f.commands, f.a_out, f.b_in, "orthogonal", "joint", &z_joints()).unwrap();
        f.commands.model_mut().set_detach_on_drag(f.a_out, false).unwrap();

        f.start_drag(f.a_out);
        assert!(matches!(f.manager.state(), DragState::CreatingTail(_)));
        assert_eq!(f.commands.model().connections().len(), 1);
    }

    // ========================================================================
    // Buttons and vanished targets
    // ========================================================================

    #[test]
    fn test_non_primary_press_is_ignored() {
        let mut f = fixture();
        f.manager.handle_pressed(f.a_out, PointerEventButton::Right);
        assert!(!f
            .manager
            .handle_drag_detected(&mut f.commands, &f.cache, Point::new(150.0, 40.0)));
        assert!(f.manager.state().is_idle());
    }

    #[test]
    fn test_non_primary_press_ends_gesture() {
        let mut f = fixture();
        f.start_drag(f.a_out);
        f.manager.handle_pressed(f.b_in, PointerEventButton::Middle);
        assert!(f.manager.state().is_idle());
    }

    #[test]
    fn test_non_primary_release_is_ignored() {
        let mut f = fixture();
        f.start_drag(f.a_out);
        f.manager.handle_mouse_released(PointerEventButton::Right);
        assert!(matches!(f.manager.state(), DragState::CreatingTail(_)));
    }

    #[test]
    fn test_vanished_source_abandons_gesture() {
        let mut f = fixture();
        f.start_drag(f.a_out);

        let emptied = GraphModel::new();
        f.manager.handle_dragged(&emptied, Point::new(200.0, 200.0));
        assert!(f.manager.state().is_idle());
    }

    #[test]
    fn test_vanished_hover_target_returns_to_tail() {
        let mut f = fixture();
        f.start_drag(f.a_out);
        f.manager.handle_drag_entered(f.commands.model(), &f.cache, f.b_in);

        // A model in which only the source connector survives
        let mut model = GraphModel::new();
        let a = model.add_node("default", Rect::new(0.0, 0.0, 100.0, 50.0));
        model.add_node("default", Rect::new(300.0, 100.0, 100.0, 50.0));
        let survivor = model.add_connector(a, "right-output").unwrap();
        assert_eq!(survivor, f.a_out);

        f.manager.handle_dragged(&model, Point::new(220.0, 60.0));
        assert!(matches!(f.manager.state(), DragState::CreatingTail(_)));
        assert_eq!(f.manager.state().tail().unwrap().end(), Point::new(220.0, 60.0));
    }

    #[test]
    fn test_drag_detected_without_press() {
        let mut f = fixture();
        assert!(!f
            .manager
            .handle_drag_detected(&mut f.commands, &f.cache, Point::new(0.0, 0.0)));
    }
}
