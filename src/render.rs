use crate::error::SerializationError;
use crate::layout::{Band, Connector, Label, Primitive, Scene, TextRun};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

#[cfg(feature = "png")]
use crate::config::RenderConfig;

pub fn render_svg(scene: &Scene) -> String {
    let mut svg = String::new();
    let width = num(scene.width);
    let height = num(scene.height);

    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&scene.background)
    );
    let _ = write!(
        svg,
        "<g font-family=\"{}\">",
        escape_xml(&scene.font_family)
    );

    for primitive in &scene.primitives {
        match primitive {
            Primitive::TextRun(run) => text_run_svg(&mut svg, run),
            Primitive::Band(band) => band_svg(&mut svg, band, scene),
            Primitive::Connector(connector) => connector_svg(&mut svg, connector),
            Primitive::Label(label) => label_svg(&mut svg, label),
        }
    }

    svg.push_str("</g></svg>");
    svg
}

/// Serialize `scene` into `sink`. Only I/O on the sink can fail.
pub fn write_svg<W: Write>(scene: &Scene, sink: &mut W) -> Result<(), SerializationError> {
    sink.write_all(render_svg(scene).as_bytes())?;
    sink.flush()?;
    Ok(())
}

fn text_run_svg(svg: &mut String, run: &TextRun) {
    if run.text.is_empty() {
        return;
    }
    let y = run.y + run.height / 2.0;
    let _ = write!(
        svg,
        "<text class=\"line\" x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\" dominant-baseline=\"central\" xml:space=\"preserve\" textLength=\"{}\" lengthAdjust=\"spacing\">{}</text>",
        num(run.x),
        num(y),
        num(run.font_size),
        escape_xml(&run.color),
        num(run.width),
        escape_xml(&run.text)
    );
}

fn band_svg(svg: &mut String, band: &Band, scene: &Scene) {
    // Open edges are drawn square; the connector marks them.
    let radius = if band.open_start || band.open_end {
        0.0
    } else {
        scene.band_radius
    };
    let class = if band.span.is_some() { "band" } else { "swatch" };
    let _ = write!(
        svg,
        "<rect class=\"{class}\" data-label=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        escape_xml(&band.label),
        num(band.x),
        num(band.y),
        num(band.width),
        num(band.height),
        num(radius),
        num(radius),
        escape_xml(&band.color),
        num(scene.band_fill_opacity),
        escape_xml(&band.color),
        num(scene.band_stroke_width)
    );
}

fn connector_svg(svg: &mut String, connector: &Connector) {
    let _ = write!(
        svg,
        "<line class=\"connector\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"1\" stroke-dasharray=\"2 2\"/>",
        num(connector.x),
        num(connector.y),
        num(connector.x + connector.width),
        num(connector.y + connector.height),
        escape_xml(&connector.color)
    );
}

fn label_svg(svg: &mut String, label: &Label) {
    let y = label.y + label.height / 2.0;
    let _ = write!(
        svg,
        "<text class=\"label\" x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\" dominant-baseline=\"central\" xml:space=\"preserve\">{}</text>",
        num(label.x),
        num(y),
        num(label.font_size),
        escape_xml(&label.color),
        escape_xml(&label.text)
    );
}

/// Two decimals, and never `-0.00`.
fn num(value: f32) -> String {
    let value = if value == 0.0 || !value.is_finite() {
        0.0
    } else {
        value
    };
    let formatted = format!("{value:.2}");
    if formatted == "-0.00" {
        "0.00".to_string()
    } else {
        formatted
    }
}

/// Escape markup characters and replace anything XML 1.0 cannot carry.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 || c == '\u{fffe}' || c == '\u{ffff}' => out.push('\u{fffd}'),
            c => out.push(c),
        }
    }
    out
}

/// Write SVG to `output`, or to stdout when `output` is `None` or `-`.
/// Files are replaced atomically.
pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<(), SerializationError> {
    match output {
        Some(path) if path != Path::new("-") => write_atomic(path, svg.as_bytes()),
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(svg.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
) -> Result<(), SerializationError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|err| SerializationError::Raster(err.to_string()))?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| SerializationError::Raster("failed to allocate pixmap".to_string()))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    let bytes = pixmap
        .encode_png()
        .map_err(|err| SerializationError::Raster(err.to_string()))?;
    write_atomic(output, &bytes)
}

/// Write to a temporary file next to `path`, then rename over it, so a
/// failed write never leaves a truncated file behind.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SerializationError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    let mut file = tempfile::NamedTempFile::new_in(parent)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
