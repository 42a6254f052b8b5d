use crate::geometry::Point;
use crate::properties::CrossingStyle;

/// Generate SVG path commands for an orthogonal polyline
///
/// `crossings[k]` holds the crossing offsets on segment `k` as produced by
/// [`find_intersections`](crate::intersections::find_intersections): x values
/// on horizontal segments, y values on vertical ones, in travel order. Each
/// crossing is drawn as a gap (a jump with `M`) or as a half-circle detour
/// (`A`) of width `gap`.
///
/// # Returns
/// SVG path command string (e.g., "M 0 0 L 46 0 M 54 0 L 100 0")
pub fn orthogonal_path_commands(
    points: &[Point],
    crossings: &[Vec<f32>],
    gap: f32,
    style: CrossingStyle,
) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };
    let mut commands = format!("M {} {}", first.x, first.y);
    let half = gap / 2.0;

    for (k, pair) in points.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        let horizontal = a.y == b.y;
        let along = if horizontal { b.x - a.x } else { b.y - a.y };
        let dir = if along < 0.0 { -1.0 } else { 1.0 };

        for &offset in crossings.get(k).map(Vec::as_slice).unwrap_or_default() {
            let (before, after) = (offset - dir * half, offset + dir * half);
            let (start, end) = if horizontal {
                (Point::new(before, a.y), Point::new(after, a.y))
            } else {
                (Point::new(a.x, before), Point::new(a.x, after))
            };
            commands.push_str(&format!(" L {} {}", start.x, start.y));
            match style {
                CrossingStyle::Gap => {
                    commands.push_str(&format!(" M {} {}", end.x, end.y));
                }
                CrossingStyle::Detour => {
                    commands.push_str(&format!(" A {} {} 0 0 1 {} {}", half, half, end.x, end.y));
                }
            }
        }
        commands.push_str(&format!(" L {} {}", b.x, b.y));
    }
    commands
}

/// Generate SVG path commands for a plain polyline, e.g. a drag tail
pub fn polyline_commands(points: &[Point]) -> String {
    orthogonal_path_commands(points, &[], 0.0, CrossingStyle::Gap)
}
