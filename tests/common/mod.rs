//! Common test utilities for integration tests.
//!
//! Builds an editor over a small diagram and reports connector geometry the
//! way node skins would after their first layout pass.

#![allow(dead_code)]

pub mod harness;

use slint_orthogonal_links::{is_path_segment_horizontal, Point};

/// Install a tracing subscriber honouring `RUST_LOG`. Safe to call from
/// every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn p(x: f32, y: f32) -> Point {
    Point::new(x, y)
}

/// Assert every leg of a full point sequence is axis-aligned with the
/// orientation its index demands.
pub fn assert_rectilinear(points: &[Point], source_horizontal: bool) {
    for (k, pair) in points.windows(2).enumerate() {
        if is_path_segment_horizontal(source_horizontal, k) {
            assert_eq!(pair[0].y, pair[1].y, "leg {k} should be horizontal: {points:?}");
        } else {
            assert_eq!(pair[0].x, pair[1].x, "leg {k} should be vertical: {points:?}");
        }
    }
}
