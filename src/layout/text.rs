use unicode_segmentation::UnicodeSegmentation;

use crate::config::LabelOverflow;
use crate::text_metrics::MonospaceMetrics;

const ELLIPSIS: &str = "\u{2026}";

#[derive(Debug, Clone, PartialEq)]
pub(super) struct FittedLabel {
    pub text: String,
    pub width: f32,
    pub truncated: bool,
}

/// Fit `text` into `available` pixels. Truncation only ever cuts between
/// grapheme clusters. `None` means nothing legible fits.
pub(super) fn fit_label(
    text: &str,
    available: f32,
    metrics: &MonospaceMetrics,
    policy: LabelOverflow,
) -> Option<FittedLabel> {
    if text.is_empty() {
        return None;
    }
    let full_width = metrics.text_width(text);
    if full_width <= available || policy == LabelOverflow::Overflow {
        return Some(FittedLabel {
            text: text.to_string(),
            width: full_width,
            truncated: false,
        });
    }

    let budget = available - metrics.text_width(ELLIPSIS);
    let mut width = 0.0f32;
    let mut end = 0usize;
    for (idx, cluster) in text.grapheme_indices(true) {
        let next = width + metrics.cluster_width(cluster);
        if next > budget {
            break;
        }
        width = next;
        end = idx + cluster.len();
    }
    if end == 0 {
        return None;
    }

    let mut truncated = text[..end].trim_end().to_string();
    if truncated.is_empty() {
        return None;
    }
    truncated.push_str(ELLIPSIS);
    let width = metrics.text_width(&truncated);
    Some(FittedLabel {
        text: truncated,
        width,
        truncated: true,
    })
}
