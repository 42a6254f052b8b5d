use crate::graph::{ConnectionId, ConnectorId, JointId, NodeId};

/// Errors raised by the model and the command facility.
///
/// Pointer-gesture handlers never surface these: a failed precondition there
/// abandons the gesture instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("connector {0} not found")]
    ConnectorNotFound(ConnectorId),
    #[error("connection {0} not found")]
    ConnectionNotFound(ConnectionId),
    #[error("joint {joint} not found in connection {connection}")]
    JointNotFound {
        connection: ConnectionId,
        joint: JointId,
    },
    #[error("connection {0} already exists")]
    DuplicateConnection(ConnectionId),
    #[error("connector type {0:?} does not encode a side")]
    UnknownSide(String),
    #[error("cannot connect connector {0} to itself")]
    SelfConnection(ConnectorId),
    #[error("joint index {index} out of range for connection {connection}")]
    JointIndexOutOfRange {
        connection: ConnectionId,
        index: usize,
    },
}

pub type Result<T> = std::result::Result<T, EditorError>;
