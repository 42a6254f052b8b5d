//! Connection path management.
//!
//! This module provides [`ConnectionPathManager`], which turns the routed point
//! sequences of all connections into SVG path commands, decorated with gaps or
//! detours where connections cross, and mirrors them into a Slint model.
//!
//! # Example
//!
//! ```ignore
//! use slint_orthogonal_links::ConnectionPathManager;
//!
//! let mut paths = ConnectionPathManager::new();
//! let model = Rc::new(VecModel::<ConnectionPath>::default());
//! paths.bind_model(model.clone(), |id, commands| ConnectionPath { id, commands });
//! window.set_connection_paths(ModelRc::from(model));
//!
//! // On every redraw
//! paths.update_paths(&routed, &properties);
//! ```

use crate::graph::ConnectionId;
use crate::intersections::{find_intersections, RoutedPath};
use crate::path::orthogonal_path_commands;
use crate::properties::{CrossingStyle, EditorProperties};
use slint::{Model, ModelRc, SharedString, VecModel};
use std::rc::Rc;

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer {
    fn sync(&self, paths: &[ConnectionPathData]);
}

/// Concrete implementation of ModelSyncer for a specific path type.
struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(i32, SharedString) -> P,
{
    fn sync(&self, paths: &[ConnectionPathData]) {
        // Update existing rows or add new ones
        for (i, path) in paths.iter().enumerate() {
            let item = (self.constructor)(path.id.0, SharedString::from(path.path_commands.as_str()));
            if i < self.model.row_count() {
                self.model.set_row_data(i, item);
            } else {
                self.model.push(item);
            }
        }
        // Remove excess rows
        while self.model.row_count() > paths.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

/// Internal representation of a connection path.
#[derive(Clone, Debug, PartialEq)]
struct ConnectionPathData {
    id: ConnectionId,
    path_commands: String,
}

/// Computed path commands for every connection, in rendering order.
///
/// Use [`bind_model`](Self::bind_model) to enable automatic synchronization
/// to a Slint `VecModel`; every [`update_paths`](Self::update_paths) call then
/// updates the bound model too.
#[derive(Default)]
pub struct ConnectionPathManager {
    paths: Vec<ConnectionPathData>,
    syncer: Option<Box<dyn ModelSyncer>>,
}

impl ConnectionPathManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a Slint model for automatic synchronization.
    ///
    /// `constructor` builds a row from (connection id, path commands).
    pub fn bind_model<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(i32, SharedString) -> P + 'static,
    {
        self.syncer = Some(Box::new(ConcreteModelSyncer { model, constructor }));
        if let Some(syncer) = &self.syncer {
            syncer.sync(&self.paths);
        }
    }

    /// Recompute all paths from the routed point sequences.
    ///
    /// With [`CrossingStyle::Gap`] a connection is interrupted where a
    /// connection drawn in front crosses it; with [`CrossingStyle::Detour`]
    /// it hops over the connections drawn behind.
    pub fn update_paths(&mut self, routed: &[RoutedPath], properties: &EditorProperties) {
        let behind = match properties.crossing_style {
            CrossingStyle::Gap => false,
            CrossingStyle::Detour => true,
        };

        self.paths = routed
            .iter()
            .enumerate()
            .map(|(index, path)| {
                let crossings = find_intersections(index, routed, behind);
                ConnectionPathData {
                    id: path.connection,
                    path_commands: orthogonal_path_commands(
                        &path.points,
                        &crossings,
                        properties.crossing_gap,
                        properties.crossing_style,
                    ),
                }
            })
            .collect();

        // Auto-sync to bound model if present
        if let Some(syncer) = &self.syncer {
            syncer.sync(&self.paths);
        }
    }

    /// Path commands of one connection.
    pub fn path(&self, id: ConnectionId) -> Option<&str> {
        self.paths
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.path_commands.as_str())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Connection ids in rendering order.
    pub fn ids(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.paths.iter().map(|p| p.id)
    }

    /// Create a detached Slint model snapshot of the current paths.
    pub fn create_paths_model<P, F>(&self, constructor: F) -> ModelRc<P>
    where
        P: Clone + 'static,
        F: Fn(i32, SharedString) -> P,
    {
        let items: Vec<P> = self
            .paths
            .iter()
            .map(|p| constructor(p.id.0, SharedString::from(p.path_commands.as_str())))
            .collect();
        ModelRc::from(Rc::new(VecModel::from(items)))
    }
}
