#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod spans;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LabelOverflow, LayoutConfig, MultilineConfig, RenderConfig, load_config};
pub use error::{Error, SerializationError, ValidationError};
pub use ir::{Document, RawAnnotation};
pub use layout::{Primitive, Scene, compute_layout};
pub use parser::parse_document;
pub use render::{render_svg, write_svg};
pub use spans::{SpanModel, build_spans};
pub use theme::Theme;

/// Theme and layout settings for one render.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn light() -> Self {
        Self::default()
    }

    pub fn dark() -> Self {
        Self {
            theme: Theme::dark(),
            layout: LayoutConfig::default(),
        }
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            theme: config.theme.clone(),
            layout: config.layout.clone(),
        }
    }
}

/// Validate and lay out a document.
pub fn layout_document(document: &Document, options: &RenderOptions) -> Result<Scene, Error> {
    let model = build_spans(document)?;
    Ok(compute_layout(&model, &options.theme, &options.layout))
}

/// Full pipeline from a parsed document to SVG markup.
pub fn render_document(document: &Document, options: &RenderOptions) -> Result<String, Error> {
    let scene = layout_document(document, options)?;
    Ok(render_svg(&scene))
}

/// Full pipeline from JSON input to SVG markup.
pub fn render_with_options(input: &str, options: RenderOptions) -> Result<String, Error> {
    let document = parse_document(input)?;
    render_document(&document, &options)
}
