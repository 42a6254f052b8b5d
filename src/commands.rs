//! Transactional edits with undo/redo.
//!
//! Every persisted change to a [`GraphModel`] is expressed as an
//! [`EditCommand`]. Applying a command yields its inverse, so the history only
//! has to store inverses. Compound commands are atomic: if one step fails the
//! steps already applied are rolled back before the error is returned.

use crate::error::Result;
use crate::geometry::Point;
use crate::graph::{Connection, ConnectionId, ConnectorId, GraphModel, Joint, JointId, NodeId};
use tracing::{debug, warn};

/// A single undoable model edit.
#[derive(Clone, Debug, PartialEq)]
pub enum EditCommand {
    /// Insert a connection at `index` in the rendering list (end if `None`).
    AddConnection {
        index: Option<usize>,
        connection: Connection,
    },
    RemoveConnection(ConnectionId),
    /// Insert a joint at `index` in the connection's joint list (end if `None`).
    AddJoint {
        connection: ConnectionId,
        index: Option<usize>,
        joint: Joint,
    },
    RemoveJoint {
        connection: ConnectionId,
        joint: JointId,
    },
    RemoveAllJoints(ConnectionId),
    MoveJoints {
        connection: ConnectionId,
        positions: Vec<(JointId, Point)>,
    },
    MoveNode {
        node: NodeId,
        position: Point,
    },
    Compound(Vec<EditCommand>),
}

impl EditCommand {
    /// Replace every joint of `connection`: one remove-all followed by one add
    /// per joint, executed as a single compound edit.
    pub fn replace_joints(connection: ConnectionId, joints: Vec<Joint>) -> EditCommand {
        let mut steps = Vec::with_capacity(joints.len() + 1);
        steps.push(EditCommand::RemoveAllJoints(connection));
        steps.extend(joints.into_iter().map(|joint| EditCommand::AddJoint {
            connection,
            index: None,
            joint,
        }));
        EditCommand::Compound(steps)
    }

    /// Apply to `model`, returning the command that reverts it.
    pub(crate) fn apply(self, model: &mut GraphModel) -> Result<EditCommand> {
        match self {
            EditCommand::AddConnection { index, connection } => {
                let id = connection.id;
                model.insert_connection(index, connection)?;
                Ok(EditCommand::RemoveConnection(id))
            }
            EditCommand::RemoveConnection(id) => {
                let (index, connection) = model.remove_connection(id)?;
                Ok(EditCommand::AddConnection {
                    index: Some(index),
                    connection,
                })
            }
            EditCommand::AddJoint {
                connection,
                index,
                joint,
            } => {
                let id = joint.id;
                model.insert_joint(connection, index, joint)?;
                Ok(EditCommand::RemoveJoint {
                    connection,
                    joint: id,
                })
            }
            EditCommand::RemoveJoint { connection, joint } => {
                let (index, joint) = model.remove_joint(connection, joint)?;
                Ok(EditCommand::AddJoint {
                    connection,
                    index: Some(index),
                    joint,
                })
            }
            EditCommand::RemoveAllJoints(connection) => {
                let removed = model.remove_all_joints(connection)?;
                Ok(EditCommand::Compound(
                    removed
                        .into_iter()
                        .map(|joint| EditCommand::AddJoint {
                            connection,
                            index: None,
                            joint,
                        })
                        .collect(),
                ))
            }
            EditCommand::MoveJoints {
                connection,
                positions,
            } => {
                let previous = model.move_joints(connection, &positions)?;
                Ok(EditCommand::MoveJoints {
                    connection,
                    positions: previous,
                })
            }
            EditCommand::MoveNode { node, position } => {
                let previous = model.move_node(node, position)?;
                Ok(EditCommand::MoveNode {
                    node,
                    position: previous,
                })
            }
            EditCommand::Compound(steps) => {
                let mut inverses = Vec::with_capacity(steps.len());
                for step in steps {
                    match step.apply(model) {
                        Ok(inverse) => inverses.push(inverse),
                        Err(err) => {
                            for inverse in inverses.into_iter().rev() {
                                if let Err(rollback) = inverse.apply(model) {
                                    warn!(%rollback, "rollback of compound edit failed");
                                }
                            }
                            return Err(err);
                        }
                    }
                }
                inverses.reverse();
                Ok(EditCommand::Compound(inverses))
            }
        }
    }
}

/// The transactional edit facility the routing core commits through.
pub trait CommandFacility {
    /// Read access to the current model.
    fn model(&self) -> &GraphModel;

    /// Apply `command` atomically and record it for undo.
    fn execute(&mut self, command: EditCommand) -> Result<()>;

    /// Hand out a fresh entity id.
    fn allocate_id(&mut self) -> i32;
}

/// In-memory [`CommandFacility`] owning the model and its undo/redo history.
#[derive(Debug)]
pub struct CommandStack {
    model: GraphModel,
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
    max_depth: usize,
}

impl CommandStack {
    /// Default maximum undo depth.
    pub const DEFAULT_MAX_DEPTH: usize = 100;

    pub fn new(model: GraphModel) -> Self {
        Self::with_max_depth(model, Self::DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(model: GraphModel, max_depth: usize) -> Self {
        Self {
            model,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Undo the last command, returning true if an undo was performed.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(command) = self.undo_stack.pop() else {
            return Ok(false);
        };
        // A failed apply leaves the model untouched; keep the entry
        let inverse = match command.clone().apply(&mut self.model) {
            Ok(inverse) => inverse,
            Err(err) => {
                warn!(%err, "undo failed, history kept");
                self.undo_stack.push(command);
                return Err(err);
            }
        };
        self.redo_stack.push(inverse);
        debug!(depth = self.undo_stack.len(), "undo");
        Ok(true)
    }

    /// Redo the last undone command, returning true if a redo was performed.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        let inverse = match command.clone().apply(&mut self.model) {
            Ok(inverse) => inverse,
            Err(err) => {
                warn!(%err, "redo failed, history kept");
                self.redo_stack.push(command);
                return Err(err);
            }
        };
        self.undo_stack.push(inverse);
        debug!(depth = self.undo_stack.len(), "redo");
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of entries on the undo stack.
    pub fn history_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Clear all history.
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Mutable access for diagram construction. Changes made here are not
    /// recorded in the history.
    pub fn model_mut(&mut self) -> &mut GraphModel {
        &mut self.model
    }
}

impl CommandFacility for CommandStack {
    fn model(&self) -> &GraphModel {
        &self.model
    }

    fn execute(&mut self, command: EditCommand) -> Result<()> {
        let inverse = command.apply(&mut self.model)?;
        self.undo_stack.push(inverse);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> i32 {
        self.model.allocate_id()
    }
}

/// Create a connection from `source` to `target` with joints at `positions`,
/// committed as one command.
pub fn create_connection(
    commands: &mut dyn CommandFacility,
    source: ConnectorId,
    target: ConnectorId,
    connection_type: &str,
    joint_type: &str,
    positions: &[Point],
) -> Result<ConnectionId> {
    let id = ConnectionId(commands.allocate_id());
    let mut connection = Connection::new(id, connection_type, source, target);
    for &position in positions {
        let joint = JointId(commands.allocate_id());
        connection
            .joints
            .push(Joint::new(joint, joint_type, position, id));
    }
    commands.execute(EditCommand::AddConnection {
        index: None,
        connection,
    })?;
    debug!(%id, %source, %target, joints = positions.len(), "connection created");
    Ok(id)
}

/// Build fresh joint entities for `positions` and replace the connection's
/// joints with them in one command.
pub fn replace_joint_positions(
    commands: &mut dyn CommandFacility,
    connection: ConnectionId,
    joint_type: &str,
    positions: &[Point],
) -> Result<()> {
    let joints = positions
        .iter()
        .map(|&position| Joint::new(JointId(commands.allocate_id()), joint_type, position, connection))
        .collect();
    commands.execute(EditCommand::replace_joints(connection, joints))?;
    debug!(%connection, joints = positions.len(), "joints replaced");
    Ok(())
}
