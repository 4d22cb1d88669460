mod text;
pub mod tracks;
pub(crate) mod types;
pub use tracks::{LineTracks, Segment, TrackAssignment, assign_tracks, greedy_tracks, occupancy};
pub use types::*;
use text::*;

use crate::config::LayoutConfig;
use crate::ir::Line;
use crate::spans::SpanModel;
use crate::text_metrics::{LineGeometry, MonospaceMetrics};
use crate::theme::Theme;
use std::collections::BTreeMap;

// Horizontal gap between a legend swatch and its label.
const LEGEND_LABEL_GAP: f32 = 4.0;

/// Turn validated spans into an absolutely positioned scene. Pure function
/// of its inputs; label colors come from `theme`.
pub fn compute_layout(model: &SpanModel, theme: &Theme, config: &LayoutConfig) -> Scene {
    let metrics = MonospaceMetrics::new(theme.font_size, config.char_width_ratio, config.tab_width);
    let label_metrics =
        MonospaceMetrics::new(theme.label_font_size, config.char_width_ratio, config.tab_width);
    let assignment = assign_tracks(&model.spans, &model.lines);

    let text_height = theme.font_size * config.line_height;
    let track_pitch = config.track_height + config.track_gap;
    let origin_x = config.padding;

    let mut text_runs = Vec::with_capacity(model.lines.len());
    let mut placed: Vec<PlacedSegment> = Vec::new();
    let mut rows = Vec::with_capacity(model.lines.len());
    let mut y = config.padding;

    for line in &model.lines {
        let geometry = metrics.line_geometry(&line.text);
        let line_tracks = &assignment.lines[line.index];

        text_runs.push(TextRun {
            x: origin_x,
            y,
            width: geometry.width(),
            height: text_height,
            text: metrics.display_text(&line.text),
            font_size: theme.font_size,
            color: theme.text_color.clone(),
            line: line.index,
        });

        let bands_top = y + text_height + config.band_gap;
        for segment in &line_tracks.segments {
            let band_y = bands_top + segment.track as f32 * track_pitch;
            placed.push(place_segment(
                model, line, &geometry, segment, origin_x, band_y, theme, config, &label_metrics,
            ));
        }

        let track_count = line_tracks.track_count;
        let mut height = text_height;
        if track_count > 0 {
            height += config.band_gap + track_count as f32 * track_pitch - config.track_gap;
        }
        rows.push(RowLayout {
            line: line.index,
            y,
            text_height,
            track_count,
            height,
        });
        y += height + config.row_gap;
    }

    // Back to front: text, bands from the bottom track up, connectors,
    // then labels.
    placed.sort_by(|a, b| a.line.cmp(&b.line).then_with(|| b.band.track.cmp(&a.band.track)));

    let mut primitives: Vec<Primitive> = text_runs.into_iter().map(Primitive::TextRun).collect();
    let mut connectors = Vec::new();
    let mut labels = Vec::new();
    for segment in placed {
        primitives.push(Primitive::Band(segment.band));
        connectors.extend(segment.connectors.into_iter().map(Primitive::Connector));
        labels.extend(segment.label.map(Primitive::Label));
    }

    let legend = legend_entries(model, theme);
    if config.legend && !legend.is_empty() {
        let (swatches, legend_labels) =
            legend_primitives(&legend, origin_x, y, config, theme, &label_metrics);
        primitives.extend(swatches);
        labels.extend(legend_labels);
    }
    primitives.extend(connectors);
    primitives.extend(labels);

    let content_right = primitives.iter().map(Primitive::right).fold(0.0f32, f32::max);
    let content_bottom = primitives.iter().map(Primitive::bottom).fold(0.0f32, f32::max);
    let width = (content_right + config.padding).max(config.padding * 2.0);
    let height = (content_bottom + config.padding).max(config.padding * 2.0);

    tracing::debug!(
        width,
        height,
        primitives = primitives.len(),
        max_tracks = assignment.max_tracks(),
        "computed layout"
    );

    Scene {
        width,
        height,
        background: theme.background.clone(),
        font_family: theme.font_family.clone(),
        band_fill_opacity: theme.band_fill_opacity,
        band_stroke_width: theme.band_stroke_width,
        band_radius: config.band_radius,
        primitives,
        rows,
        legend,
        tracks: assignment,
    }
}

struct PlacedSegment {
    line: usize,
    band: Band,
    connectors: Vec<Connector>,
    label: Option<Label>,
}

#[allow(clippy::too_many_arguments)]
fn place_segment(
    model: &SpanModel,
    line: &Line,
    geometry: &LineGeometry,
    segment: &Segment,
    origin_x: f32,
    band_y: f32,
    theme: &Theme,
    config: &LayoutConfig,
    label_metrics: &MonospaceMetrics,
) -> PlacedSegment {
    let span = &model.spans[segment.span];
    let color = theme.label_color(&span.label).to_string();
    let local = |offset: usize| offset.saturating_sub(line.start).min(line.content_len());

    let mut x1 = origin_x + geometry.x_at(local(segment.start));
    let mut x2 = origin_x + geometry.x_at(local(segment.end));
    if segment.continues_from_above {
        x1 = origin_x - config.band_overhang;
    }
    if segment.continues_below {
        x2 = origin_x + geometry.width() + config.band_overhang;
    }
    if x2 - x1 < config.min_marker_width {
        let mid = (x1 + x2) / 2.0;
        x1 = mid - config.min_marker_width / 2.0;
        x2 = mid + config.min_marker_width / 2.0;
    }
    let width = x2 - x1;

    let mut connectors = Vec::new();
    if config.multiline.connectors && segment.is_continuation() {
        if segment.continues_from_above {
            connectors.push(edge_connector(x1, band_y, config, &color));
        }
        if segment.continues_below {
            connectors.push(edge_connector(x2, band_y, config, &color));
        }
    }

    let label_text = if segment.continues_from_above {
        config
            .multiline
            .repeat_labels
            .then(|| format!("{}{}", config.multiline.continuation_prefix, span.label))
    } else {
        Some(span.label.clone())
    };
    let label = label_text.and_then(|text| {
        let available = width - 2.0 * config.label_padding;
        fit_label(&text, available, label_metrics, config.label_overflow).map(|fitted| Label {
            x: x1 + config.label_padding,
            y: band_y,
            width: fitted.width,
            height: config.track_height,
            text: fitted.text,
            font_size: theme.label_font_size,
            color: color.clone(),
            truncated: fitted.truncated,
        })
    });

    PlacedSegment {
        line: line.index,
        band: Band {
            x: x1,
            y: band_y,
            width,
            height: config.track_height,
            color,
            label: span.label.clone(),
            span: Some(segment.span),
            track: segment.track,
            open_start: segment.continues_from_above,
            open_end: segment.continues_below,
        },
        connectors,
        label,
    }
}

fn edge_connector(x: f32, band_y: f32, config: &LayoutConfig, color: &str) -> Connector {
    Connector {
        x,
        y: band_y,
        width: 0.0,
        height: config.track_height,
        color: color.to_string(),
    }
}

/// Distinct labels in sorted order with their resolved colors.
fn legend_entries(model: &SpanModel, theme: &Theme) -> Vec<LegendEntry> {
    let mut colors: BTreeMap<&str, &str> = BTreeMap::new();
    for span in &model.spans {
        colors
            .entry(span.label.as_str())
            .or_insert_with(|| theme.label_color(&span.label));
    }
    colors
        .into_iter()
        .map(|(label, color)| LegendEntry {
            label: label.to_string(),
            color: color.to_string(),
        })
        .collect()
}

fn legend_primitives(
    entries: &[LegendEntry],
    origin_x: f32,
    top: f32,
    config: &LayoutConfig,
    theme: &Theme,
    label_metrics: &MonospaceMetrics,
) -> (Vec<Primitive>, Vec<Primitive>) {
    let pitch = config.track_height + config.track_gap;
    let mut swatches = Vec::with_capacity(entries.len());
    let mut labels = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let y = top + idx as f32 * pitch;
        swatches.push(Primitive::Band(Band {
            x: origin_x,
            y,
            width: config.track_height,
            height: config.track_height,
            color: entry.color.clone(),
            label: entry.label.clone(),
            span: None,
            track: 0,
            open_start: false,
            open_end: false,
        }));
        labels.push(Primitive::Label(Label {
            x: origin_x + config.track_height + LEGEND_LABEL_GAP,
            y,
            width: label_metrics.text_width(&entry.label),
            height: config.track_height,
            text: entry.label.clone(),
            font_size: theme.label_font_size,
            color: theme.text_color.clone(),
            truncated: false,
        }));
    }
    (swatches, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Document, RawAnnotation};
    use crate::spans::build_spans;

    fn layout(text: &str, raw: &[(i64, i64, &str)], config: &LayoutConfig) -> Scene {
        let document = Document {
            text: text.to_string(),
            annotations: raw
                .iter()
                .map(|(start, end, label)| RawAnnotation::new(*start, *end, *label))
                .collect(),
        };
        let model = build_spans(&document).unwrap();
        compute_layout(&model, &Theme::light(), config)
    }

    fn no_legend() -> LayoutConfig {
        LayoutConfig {
            legend: false,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn no_annotations_renders_only_text() {
        let config = no_legend();
        let scene = layout("hello\nworld", &[], &config);
        assert_eq!(scene.text_runs().count(), 2);
        assert_eq!(scene.bands().count(), 0);
        assert_eq!(scene.labels().count(), 0);
        assert!(scene.rows.iter().all(|row| row.track_count == 0));
        let text_height = 13.0 * 1.5;
        let expected = 12.0 + text_height + 10.0 + text_height + 12.0;
        assert!((scene.height - expected).abs() < 1e-3);
    }

    #[test]
    fn band_spans_offsets_of_its_text() {
        let config = no_legend();
        let scene = layout("Ada codes", &[(4, 9, "VERB")], &config);
        let band = scene.bands().next().unwrap();
        let advance = 13.0 * 0.6;
        assert!((band.x - (12.0 + 4.0 * advance)).abs() < 1e-3);
        assert!((band.width - 5.0 * advance).abs() < 1e-3);
        let label = scene.labels().next().unwrap();
        assert_eq!(label.text, "VERB");
        assert_eq!(label.color, band.color);
    }

    #[test]
    fn emoji_cluster_shifts_following_bands_by_two_columns() {
        let config = no_legend();
        // "a", then a three-scalar ZWJ emoji, then " b".
        let scene = layout("a👩\u{200d}💻 b", &[(5, 6, "B")], &config);
        let band = scene.bands().next().unwrap();
        let advance = 13.0 * 0.6;
        assert!((band.x - (12.0 + 4.0 * advance)).abs() < 1e-3);
    }

    #[test]
    fn tracks_stack_below_the_text() {
        let config = no_legend();
        let scene = layout("abcdefgh", &[(0, 8, "LONG"), (2, 4, "SHORT")], &config);
        let bands: Vec<&Band> = scene.bands().collect();
        // Drawn bottom track first.
        assert_eq!(bands[0].track, 1);
        assert_eq!(bands[1].track, 0);
        assert!(bands[0].y > bands[1].y);
        let text = scene.text_runs().next().unwrap();
        assert!(bands[1].y >= text.y + text.height);
        assert_eq!(scene.rows[0].track_count, 2);
    }

    #[test]
    fn primitives_are_ordered_back_to_front() {
        let scene = layout("ab\ncd", &[(0, 4, "X"), (0, 1, "Y")], &LayoutConfig::default());
        let rank = |p: &Primitive| match p {
            Primitive::TextRun(_) => 0,
            Primitive::Band(_) => 1,
            Primitive::Connector(_) => 2,
            Primitive::Label(_) => 3,
        };
        let ranks: Vec<i32> = scene.primitives.iter().map(rank).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn multiline_segments_are_open_and_connected() {
        let config = no_legend();
        let scene = layout("abcdefghij\nklm", &[(1, 13, "SPAN")], &config);
        let bands: Vec<&Band> = scene.bands().collect();
        assert_eq!(bands.len(), 2);
        assert!(bands[0].open_end && !bands[0].open_start);
        assert!(bands[1].open_start && !bands[1].open_end);
        assert!((bands[1].x - (12.0 - 3.0)).abs() < 1e-3);
        assert_eq!(scene.connectors().count(), 2);
        let labels: Vec<&Label> = scene.labels().collect();
        assert_eq!(labels[0].text, "SPAN");
        assert!(labels[1].text.starts_with('\u{22ef}'));
    }

    #[test]
    fn continuation_labels_can_be_suppressed() {
        let mut config = no_legend();
        config.multiline.repeat_labels = false;
        config.multiline.connectors = false;
        let scene = layout("abcdef\nghijkl", &[(1, 10, "SPAN")], &config);
        assert_eq!(scene.labels().count(), 1);
        assert_eq!(scene.connectors().count(), 0);
    }

    #[test]
    fn zero_width_span_renders_as_marker() {
        let config = no_legend();
        let scene = layout("abc", &[(1, 1, "CARET")], &config);
        let band = scene.bands().next().unwrap();
        assert!((band.width - config.min_marker_width).abs() < 1e-3);
        let center = band.x + band.width / 2.0;
        assert!((center - (12.0 + 13.0 * 0.6)).abs() < 1e-3);
    }

    #[test]
    fn overflowing_labels_widen_the_canvas() {
        let mut config = no_legend();
        config.label_overflow = crate::config::LabelOverflow::Overflow;
        let scene = layout("a", &[(0, 1, "A_VERY_LONG_LABEL_NAME")], &config);
        let label = scene.labels().next().unwrap();
        assert!(scene.width >= label.x + label.width + config.padding - 1e-3);
    }

    #[test]
    fn legend_lists_each_label_once() {
        let scene = layout(
            "one two",
            &[(0, 3, "B"), (4, 7, "A"), (0, 7, "B")],
            &LayoutConfig::default(),
        );
        let labels: Vec<&str> = scene.legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(scene.bands().filter(|b| b.span.is_none()).count(), 2);
    }
}
