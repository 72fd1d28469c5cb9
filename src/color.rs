use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Species;

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
            let hue = (i as f32 / n as f32) * 360.0;
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

/// Fixed colour per species, shared by the chart bars and result labels.
#[derive(Debug, Clone)]
pub struct SpeciesColors {
    colors: Vec<Color32>,
}

impl Default for SpeciesColors {
    fn default() -> Self {
        Self {
            colors: generate_palette(Species::ALL.len()),
        }
    }
}

impl SpeciesColors {
    pub fn color_for(&self, species: Species) -> Color32 {
        self.colors
            .get(species.index())
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_species_gets_a_distinct_colour() {
        let colors = SpeciesColors::default();
        let [a, b, c] = Species::ALL.map(|s| colors.color_for(s));
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn empty_palette() {
        assert!(generate_palette(0).is_empty());
    }
}
