//! Editor-wide settings consumed by the routing core.

/// How a connection is decorated where another connection crosses it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CrossingStyle {
    /// Interrupt the connection drawn behind.
    #[default]
    Gap,
    /// Let the connection drawn in front hop over with a half circle.
    Detour,
}

/// Settings for one editor instance.
///
/// ```ignore
/// let properties = EditorProperties::default()
///     .with_snap_to_grid(true)
///     .with_grid_spacing(16.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EditorProperties {
    pub grid_spacing: f32,
    pub snap_to_grid: bool,
    /// Distance in pixels within which a dragged joint snaps to an alignment target.
    pub alignment_threshold: f32,
    /// Added to half the stroke width when deciding whether a press hit a path.
    pub path_hit_slop: f32,
    pub stroke_width: f32,
    /// How far a freshly routed path runs straight out of a connector.
    pub minimum_stub: f32,
    pub crossing_gap: f32,
    pub crossing_style: CrossingStyle,
    pub connector_hit_radius: f32,
}

impl Default for EditorProperties {
    fn default() -> Self {
        Self {
            grid_spacing: 12.0,
            snap_to_grid: false,
            alignment_threshold: 5.0,
            path_hit_slop: 2.0,
            stroke_width: 2.0,
            minimum_stub: 20.0,
            crossing_gap: 8.0,
            crossing_style: CrossingStyle::Gap,
            connector_hit_radius: 8.0,
        }
    }
}

impl EditorProperties {
    pub fn with_grid_spacing(mut self, spacing: f32) -> Self {
        self.grid_spacing = spacing;
        self
    }

    pub fn with_snap_to_grid(mut self, snap: bool) -> Self {
        self.snap_to_grid = snap;
        self
    }

    pub fn with_alignment_threshold(mut self, threshold: f32) -> Self {
        self.alignment_threshold = threshold;
        self
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_minimum_stub(mut self, stub: f32) -> Self {
        self.minimum_stub = stub;
        self
    }

    pub fn with_crossing_style(mut self, style: CrossingStyle, gap: f32) -> Self {
        self.crossing_style = style;
        self.crossing_gap = gap;
        self
    }

    /// Grid spacing if grid snapping is on.
    pub fn active_grid(&self) -> Option<f32> {
        self.snap_to_grid.then_some(self.grid_spacing)
    }

    /// Maximum distance from a path centre line that still counts as a hit.
    pub fn path_hit_tolerance(&self) -> f32 {
        self.stroke_width / 2.0 + self.path_hit_slop
    }
}
