use crate::geometry::{check_in_range, Point};
use crate::graph::ConnectorId;
use crate::orthogonal::is_path_segment_horizontal;

/// Find a connector at the given position
///
/// Returns the nearest connector within `hit_radius`, or `None`. Equally near
/// connectors resolve to the lowest id, independent of iteration order.
pub fn find_connector_at<I>(point: Point, connectors: I, hit_radius: f32) -> Option<ConnectorId>
where
    I: IntoIterator<Item = (ConnectorId, Point)>,
{
    let hit_radius_sq = hit_radius * hit_radius;

    connectors
        .into_iter()
        .filter_map(|(id, position)| {
            let dx = point.x - position.x;
            let dy = point.y - position.y;
            let distance_sq = dx * dx + dy * dy;
            (distance_sq <= hit_radius_sq).then_some((id, distance_sq))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(id, _)| id)
}

fn distance_to_line_segment_sq(point: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let ap = point - a;

    let ab_len_sq = ab.x * ab.x + ab.y * ab.y;

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.x * ap.x + ap.y * ap.y;
    }

    // Project point onto line, clamped to segment
    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0);
    let closest = Point::new(a.x + t * ab.x, a.y + t * ab.y);

    let dx = point.x - closest.x;
    let dy = point.y - closest.y;
    dx * dx + dy * dy
}

/// Shortest distance from `point` to the polyline through `points`.
///
/// Returns `f32::INFINITY` for fewer than two points.
pub fn path_offset(points: &[Point], point: Point) -> f32 {
    points
        .windows(2)
        .map(|pair| distance_to_line_segment_sq(point, pair[0], pair[1]))
        .fold(f32::INFINITY, f32::min)
        .sqrt()
}

/// Index of the path segment nearest to `point`.
///
/// A horizontal segment is a candidate only if `point.x` lies between its
/// endpoints, and is then ranked by vertical distance; vertical segments are
/// treated symmetrically. Orientation comes from the path's parity rather than
/// from the geometry, so zero-length segments keep their role.
pub fn nearest_segment(points: &[Point], source_horizontal: bool, point: Point) -> Option<usize> {
    let mut nearest: Option<(usize, f32)> = None;

    for (index, pair) in points.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        let distance = if is_path_segment_horizontal(source_horizontal, index) {
            check_in_range(a.x, b.x, point.x).then(|| (point.y - a.y).abs())
        } else {
            check_in_range(a.y, b.y, point.y).then(|| (point.x - a.x).abs())
        };

        if let Some(distance) = distance {
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((index, distance));
            }
        }
    }

    nearest.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z_path() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(200.0, 100.0),
        ]
    }

    // ========================================================================
    // find_connector_at() - Connector Hit Testing
    // ========================================================================

    #[test]
    fn test_find_connector_at() {
        let connectors = vec![
            (ConnectorId(1), Point::new(10.0, 10.0)),
            (ConnectorId(2), Point::new(50.0, 50.0)),
        ];

        assert_eq!(find_connector_at(Point::new(12.0, 12.0), connectors.clone(), 10.0), Some(ConnectorId(1)));
        assert_eq!(find_connector_at(Point::new(52.0, 52.0), connectors.clone(), 10.0), Some(ConnectorId(2)));
        assert_eq!(find_connector_at(Point::new(100.0, 100.0), connectors, 10.0), None);
    }

    #[test]
    fn test_find_connector_at_boundary_radius() {
        let connectors = vec![(ConnectorId(1), Point::new(50.0, 50.0))];

        // Exactly at radius distance
        assert_eq!(find_connector_at(Point::new(60.0, 50.0), connectors.clone(), 10.0), Some(ConnectorId(1)));
        // Just outside radius
        assert_eq!(find_connector_at(Point::new(60.1, 50.0), connectors, 10.0), None);
    }

    #[test]
    fn test_find_connector_at_prefers_nearest() {
        let connectors = vec![
            (ConnectorId(1), Point::new(50.0, 50.0)),
            (ConnectorId(2), Point::new(56.0, 50.0)),
        ];
        // Both within radius, the second is closer
        assert_eq!(find_connector_at(Point::new(54.0, 50.0), connectors.clone(), 10.0), Some(ConnectorId(2)));

        let mut reversed = connectors;
        reversed.reverse();
        assert_eq!(find_connector_at(Point::new(54.0, 50.0), reversed, 10.0), Some(ConnectorId(2)));
    }

    #[test]
    fn test_find_connector_at_tie_picks_lowest_id() {
        let connectors = vec![
            (ConnectorId(7), Point::new(50.0, 50.0)),
            (ConnectorId(3), Point::new(50.0, 50.0)),
        ];
        assert_eq!(find_connector_at(Point::new(50.0, 50.0), connectors, 10.0), Some(ConnectorId(3)));
    }

    // ========================================================================
    // path_offset()
    // ========================================================================

    #[test]
    fn test_path_offset_on_and_off_path() {
        let path = z_path();
        assert_eq!(path_offset(&path, Point::new(50.0, 0.0)), 0.0);
        assert_eq!(path_offset(&path, Point::new(50.0, 3.0)), 3.0);
        assert_eq!(path_offset(&path, Point::new(104.0, 50.0)), 4.0);
    }

    #[test]
    fn test_path_offset_needs_two_points() {
        assert_eq!(path_offset(&[Point::new(0.0, 0.0)], Point::new(1.0, 1.0)), f32::INFINITY);
    }

    // ========================================================================
    // nearest_segment()
    // ========================================================================

    #[test]
    fn test_nearest_segment_horizontal() {
        let path = z_path();
        assert_eq!(nearest_segment(&path, true, Point::new(50.0, 2.0)), Some(0));
        assert_eq!(nearest_segment(&path, true, Point::new(150.0, 98.0)), Some(2));
    }

    #[test]
    fn test_nearest_segment_vertical() {
        let path = z_path();
        assert_eq!(nearest_segment(&path, true, Point::new(101.0, 50.0)), Some(1));
    }

    #[test]
    fn test_nearest_segment_requires_projection_inside_segment() {
        let path = z_path();
        // Left of everything and above the vertical segment's span
        assert_eq!(nearest_segment(&path, true, Point::new(-10.0, -10.0)), None);
    }

    #[test]
    fn test_nearest_segment_empty_path() {
        assert_eq!(nearest_segment(&[], true, Point::new(0.0, 0.0)), None);
    }
}
