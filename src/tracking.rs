//! Convenience helpers for geometry tracking setup.
//!
//! This module provides [`GeometryTracker`], a wrapper around [`GeometryCache`]
//! that hands out report callbacks for node and connector skins.
//!
//! # Example
//!
//! ```ignore
//! use slint_orthogonal_links::GeometryTracker;
//!
//! let tracker = editor.geometry_tracker();
//!
//! // Wire up callbacks (one-time setup)
//! window.on_node_rect_changed(tracker.node_rect_callback());
//! window.on_connector_position_changed(tracker.connector_position_callback());
//! ```

use crate::graph::{ConnectorId, NodeId};
use crate::state::GeometryCache;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Shares one [`GeometryCache`] between skin report callbacks and the editor.
#[derive(Clone, Default)]
pub struct GeometryTracker {
    cache: Rc<RefCell<GeometryCache>>,
}

impl GeometryTracker {
    /// Create a new geometry tracker with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker wrapping an existing cache.
    pub fn with_cache(cache: Rc<RefCell<GeometryCache>>) -> Self {
        Self { cache }
    }

    /// Get a clone of the internal cache reference.
    pub fn cache(&self) -> Rc<RefCell<GeometryCache>> {
        self.cache.clone()
    }

    /// Borrow the cache for reading.
    pub fn cache_ref(&self) -> Ref<'_, GeometryCache> {
        self.cache.borrow()
    }

    /// Get a callback for node rectangle updates.
    ///
    /// The callback signature matches a Slint callback
    /// `(id: int, x: length, y: length, width: length, height: length)`.
    pub fn node_rect_callback(&self) -> impl Fn(i32, f32, f32, f32, f32) + Clone {
        let cache = self.cache.clone();
        move |id, x, y, width, height| {
            cache
                .borrow_mut()
                .update_node_rect(NodeId(id), x, y, width, height);
        }
    }

    /// Get a callback for connector position updates.
    ///
    /// The callback signature matches a Slint callback
    /// `(connector_id: int, node_id: int, rel_x: length, rel_y: length)`.
    pub fn connector_position_callback(&self) -> impl Fn(i32, i32, f32, f32) + Clone {
        let cache = self.cache.clone();
        move |connector_id, node_id, rel_x, rel_y| {
            cache.borrow_mut().handle_connector_report(
                ConnectorId(connector_id),
                NodeId(node_id),
                rel_x,
                rel_y,
            );
        }
    }
}
