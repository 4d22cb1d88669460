use crate::config::load_config;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_document;
use crate::render::{render_svg, write_output_svg};
use crate::spans::build_spans;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "annovis",
    version,
    about = "Visualize character-offset text annotations as SVG"
)]
pub struct Args {
    /// Input JSON file with "text" and "annotations", or '-' for stdin
    pub input: PathBuf,

    /// Path to output file where the visualization will be written ('-' for stdout)
    #[arg(short = 'o', long = "output", default_value = "annotations.svg")]
    pub output: PathBuf,

    /// Output format. Inferred from the output extension when omitted.
    #[arg(short = 'e', long = "outputFormat", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Config JSON/JSON5 file (theme, themeVariables, layout)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Also write the computed track assignment and geometry as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Log pipeline details to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    execute(&args)
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

pub fn execute(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref()).context("failed to load config")?;
    let input = read_input(&args.input)?;
    let document = parse_document(&input)
        .with_context(|| format!("invalid input {}", args.input.display()))?;
    let model = build_spans(&document)
        .with_context(|| format!("invalid input {}", args.input.display()))?;
    let scene = compute_layout(&model, &config.theme, &config.layout);

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &scene, &model)
            .with_context(|| format!("failed to write layout dump {}", path.display()))?;
    }

    let svg = render_svg(&scene);
    let format = resolve_format(args.output_format, &args.output);
    match format {
        OutputFormat::Svg => {
            if args.output != Path::new("-") {
                tracing::info!("Writing SVG to: {}", args.output.display());
            }
            write_output_svg(&svg, Some(&args.output))?;
        }
        OutputFormat::Png => write_png(&svg, &args.output, &config)?,
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &crate::config::Config) -> Result<()> {
    if output == Path::new("-") {
        anyhow::bail!("PNG output requires a file path");
    }
    tracing::info!("Writing PNG to: {}", output.display());
    crate::render::write_output_png(svg, output, &config.render)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &crate::config::Config) -> Result<()> {
    anyhow::bail!("PNG output is not available in this build (enable the `png` feature)")
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn resolve_format(explicit: Option<OutputFormat>, output: &Path) -> OutputFormat {
    if let Some(format) = explicit {
        return format;
    }
    let is_png = output
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);
    if is_png {
        OutputFormat::Png
    } else {
        OutputFormat::Svg
    }
}
