//! Connection validation policy.
//!
//! The drag state machine consults a [`ConnectorValidator`] several times per
//! gesture: `prevalidate` decides whether a hovered connector reacts at all,
//! `validate` decides whether releasing over it would create a connection.

use crate::graph::{ConnectorId, GraphModel};
use slint::Color;
use thiserror::Error;

/// Visual feedback applied to a hovered connector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectorStyle {
    #[default]
    Default,
    Allowed,
    Forbidden,
}

impl ConnectorStyle {
    pub fn color(self) -> Color {
        match self {
            ConnectorStyle::Default => Color::from_rgb_u8(255, 255, 255),
            ConnectorStyle::Allowed => Color::from_rgb_u8(80, 200, 120),
            ConnectorStyle::Forbidden => Color::from_rgb_u8(230, 70, 70),
        }
    }
}

/// Capability interface injected into each editor instance.
///
/// Implementations must be cheap and free of side effects.
pub trait ConnectorValidator {
    /// Whether `target` takes part in this gesture at all.
    fn prevalidate(&self, model: &GraphModel, source: ConnectorId, target: ConnectorId) -> bool;

    /// Whether a connection from `source` to `target` may be created.
    fn validate(&self, model: &GraphModel, source: ConnectorId, target: ConnectorId) -> bool;

    /// Type string for a new connection.
    fn create_connection_type(
        &self,
        _model: &GraphModel,
        _source: ConnectorId,
        _target: ConnectorId,
    ) -> String {
        "orthogonal".to_string()
    }

    /// Type string for the joints of a new connection.
    fn create_joint_type(
        &self,
        _model: &GraphModel,
        _source: ConnectorId,
        _target: ConnectorId,
    ) -> String {
        "joint".to_string()
    }
}

/// Result of a validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Combine two results (AND logic): returns first error if any
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => other,
            invalid => invalid,
        }
    }
}

/// Reasons why a connection was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} not found")]
    ConnectorNotFound(ConnectorId),
    #[error("cannot connect a connector to itself")]
    SameConnector,
    #[error("cannot connect connectors on the same node")]
    SameNode,
    #[error("connection already exists")]
    DuplicateConnection,
    #[error("{connector} has reached max {max} connections")]
    MaxConnectionsReached { connector: ConnectorId, max: usize },
}

/// The stock policy: no self or same-node connections, no duplicates, and
/// optionally a per-connector connection limit.
///
/// ```ignore
/// let validator = DefaultConnectorValidator::new().with_max_connections(1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DefaultConnectorValidator {
    max_connections: Option<usize>,
}

impl DefaultConnectorValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// The checks behind `prevalidate`, with the reason on failure.
    pub fn explain_prevalidate(
        &self,
        model: &GraphModel,
        source: ConnectorId,
        target: ConnectorId,
    ) -> ValidationResult {
        if source == target {
            return ValidationResult::Invalid(ValidationError::SameConnector);
        }
        let Some(source_node) = model.node_of(source) else {
            return ValidationResult::Invalid(ValidationError::ConnectorNotFound(source));
        };
        let Some(target_node) = model.node_of(target) else {
            return ValidationResult::Invalid(ValidationError::ConnectorNotFound(target));
        };
        if source_node == target_node {
            return ValidationResult::Invalid(ValidationError::SameNode);
        }
        ValidationResult::Valid
    }

    /// The checks behind `validate`, with the reason on failure.
    pub fn explain(
        &self,
        model: &GraphModel,
        source: ConnectorId,
        target: ConnectorId,
    ) -> ValidationResult {
        self.explain_prevalidate(model, source, target)
            .and(self.check_duplicate(model, source, target))
            .and(self.check_limit(model, target))
    }

    fn check_duplicate(
        &self,
        model: &GraphModel,
        source: ConnectorId,
        target: ConnectorId,
    ) -> ValidationResult {
        if model.connection_exists(source, target) || model.connection_exists(target, source) {
            ValidationResult::Invalid(ValidationError::DuplicateConnection)
        } else {
            ValidationResult::Valid
        }
    }

    fn check_limit(&self, model: &GraphModel, target: ConnectorId) -> ValidationResult {
        let (Some(max), Some(connector)) = (self.max_connections, model.connector(target)) else {
            return ValidationResult::Valid;
        };
        if connector.connections.len() >= max {
            ValidationResult::Invalid(ValidationError::MaxConnectionsReached {
                connector: target,
                max,
            })
        } else {
            ValidationResult::Valid
        }
    }
}

impl ConnectorValidator for DefaultConnectorValidator {
    fn prevalidate(&self, model: &GraphModel, source: ConnectorId, target: ConnectorId) -> bool {
        self.explain_prevalidate(model, source, target).is_valid()
    }

    fn validate(&self, model: &GraphModel, source: ConnectorId, target: ConnectorId) -> bool {
        self.explain(model, source, target).is_valid()
    }
}
