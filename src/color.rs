use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Group;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
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
// Color mapping: group → Color32
// ---------------------------------------------------------------------------

/// Stable colour per group, shared by every chart and the filter checkboxes.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Group, Color32>,
}

impl Default for ColorMap {
    fn default() -> Self {
        let mapping = Group::ALL
            .into_iter()
            .zip(generate_palette(Group::ALL.len()))
            .collect();
        ColorMap { mapping }
    }
}

impl ColorMap {
    pub fn color_for(&self, group: Group) -> Color32 {
        self.mapping.get(&group).copied().unwrap_or(Color32::GRAY)
    }

    /// Same hue at the given opacity, for overlaid bars.
    pub fn translucent(&self, group: Group, opacity: f32) -> Color32 {
        self.color_for(group).gamma_multiply(opacity)
    }
}
