//! Crossing points between routed connections.
//!
//! Every physical crossing between two connections is reported by exactly one
//! of them for a given `behind` flag: the connection earlier in the rendering
//! list sees it with `behind == false`, the later one with `behind == true`.
//! Crossings of a connection with itself follow the same rule on segment
//! indices.

use crate::geometry::{check_intersection, Point};
use crate::graph::ConnectionId;
use crate::orthogonal::is_path_segment_horizontal;

/// The full point sequence of one connection, in rendering order.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutedPath {
    pub connection: ConnectionId,
    pub points: Vec<Point>,
    pub source_horizontal: bool,
}

impl RoutedPath {
    fn segments(&self) -> impl Iterator<Item = (usize, Point, Point, bool)> + '_ {
        self.points.windows(2).enumerate().map(|(k, pair)| {
            (
                k,
                pair[0],
                pair[1],
                is_path_segment_horizontal(self.source_horizontal, k),
            )
        })
    }
}

/// Crossing offsets along each segment of `paths[index]`.
///
/// `behind == true` considers connections drawn behind this one, `false` those
/// drawn in front. Each inner list holds the other segment's x for a
/// horizontal segment (y for a vertical one), ordered along the segment's own
/// direction of travel.
pub fn find_intersections(index: usize, paths: &[RoutedPath], behind: bool) -> Vec<Vec<f32>> {
    let Some(path) = paths.get(index) else {
        return Vec::new();
    };

    path.segments()
        .map(|(i, a, b, horizontal)| {
            let mut offsets = Vec::new();

            for (other_index, other) in paths.iter().enumerate() {
                let same = other_index == index;
                if !same && (other_index < index) != behind {
                    continue;
                }
                for (j, c, d, other_horizontal) in other.segments() {
                    if same && (j == i || (j < i) != behind) {
                        continue;
                    }
                    if horizontal == other_horizontal {
                        continue;
                    }
                    if horizontal {
                        if check_intersection(a, b, c, d) {
                            offsets.push(c.x);
                        }
                    } else if check_intersection(c, d, a, b) {
                        offsets.push(c.y);
                    }
                }
            }

            offsets.sort_by(f32::total_cmp);
            let decreasing = if horizontal { b.x < a.x } else { b.y < a.y };
            if decreasing {
                offsets.reverse();
            }
            offsets
        })
        .collect()
}
