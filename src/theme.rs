use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEFAULT_PALETTE: [&str; 12] = [
    "#4E79A7", "#F28E2B", "#E15759", "#76B7B2", "#59A14F", "#EDC948", "#B07AA1", "#FF9DA7",
    "#9C755F", "#BAB0AC", "#1F77B4", "#D62728",
];

const DARK_PALETTE: [&str; 12] = [
    "#8AB4F8", "#FDD663", "#F28B82", "#81C995", "#FCAD70", "#C58AF9", "#78D9EC", "#FF8BCB",
    "#E6C9A8", "#AECBFA", "#CCFF90", "#A7FFEB",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub label_font_size: f32,
    pub text_color: String,
    pub background: String,
    pub band_fill_opacity: f32,
    pub band_stroke_width: f32,
    pub palette: Vec<String>,
    /// Fixed colors for known labels; everything else hashes into `palette`.
    pub label_colors: BTreeMap<String, String>,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            font_family: "ui-monospace, Menlo, Consolas, \"DejaVu Sans Mono\", monospace"
                .to_string(),
            font_size: 13.0,
            label_font_size: 9.0,
            text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
            band_fill_opacity: 0.22,
            band_stroke_width: 1.0,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            label_colors: BTreeMap::new(),
        }
    }

    pub fn dark() -> Self {
        Self {
            text_color: "#E8EAED".to_string(),
            background: "#202124".to_string(),
            band_fill_opacity: 0.3,
            palette: DARK_PALETTE.iter().map(|c| c.to_string()).collect(),
            ..Self::light()
        }
    }

    /// Color for a label: the explicit mapping if there is one, otherwise a
    /// stable pick from the palette.
    pub fn label_color(&self, label: &str) -> &str {
        if let Some(color) = self.label_colors.get(label) {
            return color;
        }
        if self.palette.is_empty() {
            return self.text_color.as_str();
        }
        let idx = (fnv1a64(label.as_bytes()) % self.palette.len() as u64) as usize;
        &self.palette[idx]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// 64-bit FNV-1a. Stable across platforms and releases, unlike the std
/// hasher.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_matches_reference_vectors() {
        assert_eq!(fnv1a64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a64(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn explicit_label_colors_win() {
        let mut theme = Theme::light();
        theme
            .label_colors
            .insert("PERSON".to_string(), "#123456".to_string());
        assert_eq!(theme.label_color("PERSON"), "#123456");
    }

    #[test]
    fn fallback_color_is_stable_and_from_palette() {
        let theme = Theme::light();
        let first = theme.label_color("ORG").to_string();
        assert_eq!(theme.label_color("ORG"), first);
        assert!(theme.palette.contains(&first));
    }

    #[test]
    fn empty_palette_falls_back_to_text_color() {
        let mut theme = Theme::dark();
        theme.palette.clear();
        assert_eq!(theme.label_color("X"), theme.text_color);
    }
}
