use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// What to do with a label wider than its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelOverflow {
    /// Cut on a grapheme cluster boundary and append an ellipsis. Labels
    /// where not even one cluster fits are dropped.
    Ellipsis,
    /// Draw the whole label past the band's end.
    Overflow,
}

/// Presentation of spans that cross a line break.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultilineConfig {
    /// Repeat the label on segments that continue a span from the line above.
    pub repeat_labels: bool,
    pub continuation_prefix: String,
    /// Draw a dashed marker on the open edge of continued segments.
    pub connectors: bool,
}

impl Default for MultilineConfig {
    fn default() -> Self {
        Self {
            repeat_labels: true,
            continuation_prefix: "\u{22ef}".to_string(),
            connectors: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub padding: f32,
    pub char_width_ratio: f32,
    pub line_height: f32,
    pub tab_width: usize,
    pub band_gap: f32,
    pub track_height: f32,
    pub track_gap: f32,
    pub row_gap: f32,
    pub band_radius: f32,
    pub band_overhang: f32,
    pub min_marker_width: f32,
    pub label_padding: f32,
    pub label_overflow: LabelOverflow,
    pub legend: bool,
    pub multiline: MultilineConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 12.0,
            char_width_ratio: 0.6,
            line_height: 1.5,
            tab_width: 4,
            band_gap: 2.0,
            track_height: 13.0,
            track_gap: 3.0,
            row_gap: 10.0,
            band_radius: 3.0,
            band_overhang: 3.0,
            min_marker_width: 3.0,
            label_padding: 2.0,
            label_overflow: LabelOverflow::Ellipsis,
            legend: true,
            multiline: MultilineConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Fallback raster size when the SVG carries none.
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::light(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    label_font_size: Option<f32>,
    text_color: Option<String>,
    background: Option<String>,
    band_fill_opacity: Option<f32>,
    band_stroke_width: Option<f32>,
    palette: Option<Vec<String>>,
    label_colors: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultilineConfigFile {
    repeat_labels: Option<bool>,
    continuation_prefix: Option<String>,
    connectors: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    padding: Option<f32>,
    char_width_ratio: Option<f32>,
    line_height: Option<f32>,
    tab_width: Option<usize>,
    band_gap: Option<f32>,
    track_height: Option<f32>,
    track_gap: Option<f32>,
    row_gap: Option<f32>,
    band_radius: Option<f32>,
    band_overhang: Option<f32>,
    min_marker_width: Option<f32>,
    label_padding: Option<f32>,
    label_overflow: Option<LabelOverflow>,
    legend: Option<bool>,
    multiline: Option<MultilineConfigFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    width: Option<f32>,
    height: Option<f32>,
}

/// Load a JSON (or JSON5) config file on top of the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "dark" => config.theme = Theme::dark(),
            "default" | "light" => config.theme = Theme::light(),
            other => anyhow::bail!("unknown theme {other:?} (expected \"default\" or \"dark\")"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.label_font_size {
            config.theme.label_font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.band_fill_opacity {
            config.theme.band_fill_opacity = v;
        }
        if let Some(v) = vars.band_stroke_width {
            config.theme.band_stroke_width = v;
        }
        if let Some(v) = vars.palette {
            config.theme.palette = v;
        }
        if let Some(v) = vars.label_colors {
            config.theme.label_colors.extend(v);
        }
    }

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.padding {
            target.padding = v;
        }
        if let Some(v) = layout.char_width_ratio {
            target.char_width_ratio = v;
        }
        if let Some(v) = layout.line_height {
            target.line_height = v;
        }
        if let Some(v) = layout.tab_width {
            target.tab_width = v;
        }
        if let Some(v) = layout.band_gap {
            target.band_gap = v;
        }
        if let Some(v) = layout.track_height {
            target.track_height = v;
        }
        if let Some(v) = layout.track_gap {
            target.track_gap = v;
        }
        if let Some(v) = layout.row_gap {
            target.row_gap = v;
        }
        if let Some(v) = layout.band_radius {
            target.band_radius = v;
        }
        if let Some(v) = layout.band_overhang {
            target.band_overhang = v;
        }
        if let Some(v) = layout.min_marker_width {
            target.min_marker_width = v;
        }
        if let Some(v) = layout.label_padding {
            target.label_padding = v;
        }
        if let Some(v) = layout.label_overflow {
            target.label_overflow = v;
        }
        if let Some(v) = layout.legend {
            target.legend = v;
        }
        if let Some(multiline) = layout.multiline {
            if let Some(v) = multiline.repeat_labels {
                target.multiline.repeat_labels = v;
            }
            if let Some(v) = multiline.continuation_prefix {
                target.multiline.continuation_prefix = v;
            }
            if let Some(v) = multiline.connectors {
                target.multiline.connectors = v;
            }
        }
    }

    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.theme.font_size, 13.0);
        assert_eq!(config.layout.label_overflow, LabelOverflow::Ellipsis);
        assert!(config.layout.legend);
    }

    #[test]
    fn applies_theme_and_overrides() {
        let config = parse_config(
            r##"{
                // JSON5 comments are allowed
                theme: "dark",
                themeVariables: { fontSize: 16, labelColors: { PERSON: "#ff0000" } },
                layout: { trackHeight: 20, labelOverflow: "overflow", multiline: { connectors: false } },
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.background, "#202124");
        assert_eq!(config.theme.font_size, 16.0);
        assert_eq!(config.theme.label_color("PERSON"), "#ff0000");
        assert_eq!(config.layout.track_height, 20.0);
        assert_eq!(config.layout.label_overflow, LabelOverflow::Overflow);
        assert!(!config.layout.multiline.connectors);
        assert!(config.layout.multiline.repeat_labels);
    }

    #[test]
    fn rejects_unknown_theme() {
        assert!(parse_config(r#"{"theme": "neon"}"#).is_err());
    }

    #[test]
    fn missing_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.padding, 12.0);
    }
}
