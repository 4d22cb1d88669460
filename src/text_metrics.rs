use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const VARIATION_SELECTOR_EMOJI: char = '\u{fe0f}';

/// Fixed monospace glyph model. Widths are counted in terminal-style
/// columns per grapheme cluster and scaled by a single advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub font_size: f32,
    /// Horizontal advance of one column in pixels.
    pub advance: f32,
    pub tab_width: usize,
}

impl MonospaceMetrics {
    pub fn new(font_size: f32, char_width_ratio: f32, tab_width: usize) -> Self {
        Self {
            font_size,
            advance: (font_size * char_width_ratio).max(0.0),
            tab_width,
        }
    }

    pub fn cluster_width(&self, cluster: &str) -> f32 {
        cluster_columns(cluster, self.tab_width) as f32 * self.advance
    }

    pub fn text_width(&self, text: &str) -> f32 {
        text.graphemes(true)
            .map(|cluster| cluster_columns(cluster, self.tab_width))
            .sum::<usize>() as f32
            * self.advance
    }

    pub fn line_geometry(&self, text: &str) -> LineGeometry {
        LineGeometry::new(text, self)
    }

    /// Text as it should be drawn so that the viewer's columns line up with
    /// the model: tabs become spaces.
    pub fn display_text(&self, text: &str) -> String {
        if !text.contains('\t') {
            return text.to_string();
        }
        text.replace('\t', &" ".repeat(self.tab_width))
    }
}

/// Columns occupied by one grapheme cluster.
pub fn cluster_columns(cluster: &str, tab_width: usize) -> usize {
    let Some(first) = cluster.chars().next() else {
        return 0;
    };
    if first == '\t' {
        return tab_width;
    }
    if crate::ir::is_line_break(first) {
        return 0;
    }
    if first.is_control() {
        // Rendered as U+FFFD.
        return 1;
    }
    if cluster.contains(VARIATION_SELECTOR_EMOJI) {
        return 2;
    }
    // ZWJ sequences can report the sum of their parts; they still draw as
    // a single wide glyph.
    cluster.width().clamp(1, 2)
}

/// Offset to x-coordinate mapping for one line of text, measured from the
/// line's left edge. Offsets are scalar value indices local to the line.
#[derive(Debug, Clone)]
pub struct LineGeometry {
    /// Scalar offset at which each cluster starts, plus a trailing sentinel
    /// at the line length.
    starts: Vec<usize>,
    /// Left edge of each cluster, plus the total width as the sentinel.
    xs: Vec<f32>,
}

impl LineGeometry {
    fn new(text: &str, metrics: &MonospaceMetrics) -> Self {
        let mut starts = Vec::new();
        let mut xs = Vec::new();
        let mut offset = 0usize;
        let mut x = 0.0f32;
        for cluster in text.graphemes(true) {
            starts.push(offset);
            xs.push(x);
            offset += cluster.chars().count();
            x += metrics.cluster_width(cluster);
        }
        starts.push(offset);
        xs.push(x);
        Self { starts, xs }
    }

    pub fn width(&self) -> f32 {
        self.xs.last().copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.starts.last().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Left edge of the cluster containing `offset`. Offsets inside a
    /// multi-scalar cluster snap to its leading edge; offsets at or past the
    /// end map to the full line width.
    pub fn x_at(&self, offset: usize) -> f32 {
        let idx = self.starts.partition_point(|start| *start <= offset);
        self.xs[idx.saturating_sub(1)]
    }

    pub fn cluster_count(&self) -> usize {
        self.starts.len() - 1
    }
}
