use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::SpeciesColors;
use crate::data::model::{Species, SpeciesCounts};

// ---------------------------------------------------------------------------
// Prediction distribution (batch results)
// ---------------------------------------------------------------------------

/// Bar chart of predicted species counts, one bar per species in fixed order.
pub fn distribution_chart(ui: &mut Ui, counts: &SpeciesCounts, colors: &SpeciesColors) {
    ui.strong("Prediction Distribution");

    let bars: Vec<Bar> = counts
        .entries()
        .map(|(species, n)| {
            Bar::new(species.index() as f64, n as f64)
                .name(species.short_label())
                .fill(colors.color_for(species))
                .width(0.6)
        })
        .collect();

    Plot::new("prediction_distribution")
        .legend(Legend::default())
        .height(280.0)
        .y_axis_label("Count")
        .x_axis_formatter(|mark, _range| category_label(mark.value))
        .include_y(0.0)
        .include_y(counts.total().max(1) as f64)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Count"));
        });
}

/// X-axis tick label: species name on integer positions, blank elsewhere.
fn category_label(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 {
        return String::new();
    }
    Species::ALL
        .iter()
        .find(|s| s.index() as f64 == rounded)
        .map(|s| s.short_label().to_string())
        .unwrap_or_default()
}
