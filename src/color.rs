use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::selection::SeriesKind;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
///
/// Hues start at `offset` degrees.
pub fn generate_palette(n: usize, offset: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (offset + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Series colours: chart series → Color32
// ---------------------------------------------------------------------------

/// Hue of the first series (blue).
const FIRST_HUE: f32 = 210.0;

/// Fixed colour for each charted metric.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    mapping: BTreeMap<SeriesKind, Color32>,
    default_color: Color32,
}

impl Default for SeriesColors {
    fn default() -> Self {
        let palette = generate_palette(SeriesKind::ALL.len(), FIRST_HUE);
        SeriesColors {
            mapping: SeriesKind::ALL.into_iter().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }
}

impl SeriesColors {
    pub fn color_for(&self, kind: SeriesKind) -> Color32 {
        self.mapping
            .get(&kind)
            .copied()
            .unwrap_or(self.default_color)
    }
}
