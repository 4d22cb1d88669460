use super::tracks::TrackAssignment;

/// A run of source text: one per line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    pub font_size: f32,
    pub color: String,
    pub line: usize,
}

/// An underline band for one span segment, or a legend swatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
    pub label: String,
    /// Index into the span list; `None` for legend swatches.
    pub span: Option<usize>,
    pub track: usize,
    pub open_start: bool,
    pub open_end: bool,
}

/// Dashed marker on the open edge of a segment that continues on another
/// line.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    pub font_size: f32,
    pub color: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    TextRun(TextRun),
    Band(Band),
    Connector(Connector),
    Label(Label),
}

impl Primitive {
    /// `(x, y, width, height)` of the primitive.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        match self {
            Primitive::TextRun(run) => (run.x, run.y, run.width, run.height),
            Primitive::Band(band) => (band.x, band.y, band.width, band.height),
            Primitive::Connector(c) => (c.x, c.y, c.width, c.height),
            Primitive::Label(label) => (label.x, label.y, label.width, label.height),
        }
    }

    pub fn right(&self) -> f32 {
        let (x, _, width, _) = self.bounds();
        x + width
    }

    pub fn bottom(&self) -> f32 {
        let (_, y, _, height) = self.bounds();
        y + height
    }
}

/// Per-line row geometry, kept for dumps and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub line: usize,
    pub y: f32,
    pub text_height: f32,
    pub track_count: usize,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Render-ready scene, primitives ordered back to front.
#[derive(Debug, Clone)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub font_family: String,
    pub band_fill_opacity: f32,
    pub band_stroke_width: f32,
    pub band_radius: f32,
    pub primitives: Vec<Primitive>,
    pub rows: Vec<RowLayout>,
    pub legend: Vec<LegendEntry>,
    pub tracks: TrackAssignment,
}

impl Scene {
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::TextRun(run) => Some(run),
            _ => None,
        })
    }

    pub fn bands(&self) -> impl Iterator<Item = &Band> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Band(band) => Some(band),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Label(label) => Some(label),
            _ => None,
        })
    }

    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Connector(connector) => Some(connector),
            _ => None,
        })
    }
}
