use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::SpeciesColors;
use crate::data::model::{Feature, FeatureBatch, Species};
use crate::report::Report;
use crate::state::{AppState, Outcome, Page, Tab};
use crate::ui::plot;

const DATASET_URL: &str = "https://www.kaggle.com/uciml/iris";
const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the central panel: header, then the selected page.
pub fn central_panel(ui: &mut Ui, state: &mut AppState, colors: &SpeciesColors) {
    ui.heading("🌸 Welcome to My Machine Learning Dashboard");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("This dashboard created by :");
        ui.hyperlink_to(state.config.author_name.as_str(), &state.config.author_url);
    });
    ui.label("Use the sidebar to explore the available features.");
    ui.separator();

    if state.page != Page::IrisPrediction {
        return;
    }

    ui.heading("🔮 Iris Species Prediction");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("This app predicts the");
        ui.strong("Iris Species.");
        ui.label("Dataset:");
        ui.hyperlink_to("Iris dataset (UCIML)", DATASET_URL);
    });
    ui.add_space(4.0);

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Prediction, "🔮 Prediction");
        ui.selectable_value(&mut state.tab, Tab::About, "📘 About Model");
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            Tab::Prediction => prediction_tab(ui, state, colors),
            Tab::About => about_tab(ui, state),
        });
}

// ---------------------------------------------------------------------------
// Prediction tab
// ---------------------------------------------------------------------------

fn prediction_tab(ui: &mut Ui, state: &AppState, colors: &SpeciesColors) {
    sample_image(ui, state);
    ui.add_space(8.0);

    ui.heading("📊 Input Data");
    input_table(ui, &state.input_batch());
    ui.add_space(8.0);

    if state.is_pending() {
        ui.horizontal(|ui: &mut Ui| {
            ui.spinner();
            ui.label("⏳ Running prediction...");
        });
        return;
    }

    match &state.outcome {
        Some(Outcome::Report(Report::Single(species))) => single_result(ui, *species, colors),
        Some(Outcome::Report(Report::Batch { labels, counts })) => {
            ui.label(
                RichText::new("🎉 Predictions completed for multiple rows!")
                    .color(Color32::DARK_GREEN),
            );
            prediction_table(ui, labels, colors);
            ui.add_space(8.0);
            plot::distribution_chart(ui, counts, colors);
        }
        Some(Outcome::Failed(msg)) => {
            ui.label(RichText::new(format!("Prediction failed: {msg}")).color(Color32::RED));
        }
        None => {}
    }
}

fn sample_image(ui: &mut Ui, state: &AppState) {
    let path = &state.config.image_path;
    if state.image_available {
        let uri = format!("file://{}", path.display());
        ui.add(egui::Image::new(uri).max_width(500.0));
        ui.label(RichText::new("Sample Iris Flower").italics());
    } else {
        ui.label(
            RichText::new(format!(
                "⚠️ {} not found in folder. Please add the image.",
                path.display()
            ))
            .color(Color32::from_rgb(0xd0, 0x90, 0x00)),
        );
    }
}

fn single_result(ui: &mut Ui, species: Species, colors: &SpeciesColors) {
    egui::Frame::group(ui.style())
        .fill(Color32::from_rgb(0xf0, 0xf0, 0xff))
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.label(
                    RichText::new("🌸 Prediction Result:")
                        .strong()
                        .color(Color32::BLACK),
                );
                ui.label(
                    RichText::new(species.label())
                        .strong()
                        .color(colors.color_for(species)),
                );
            });
        });
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn input_table(ui: &mut Ui, batch: &FeatureBatch) {
    ui.push_id("input_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(220.0)
            .column(Column::auto().at_least(32.0))
            .columns(Column::auto().at_least(110.0), Feature::ALL.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for feature in Feature::ALL {
                    header.col(|ui| {
                        ui.strong(feature.column());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, batch.len(), |mut row| {
                    let i = row.index();
                    let record = &batch.records[i];
                    row.col(|ui| {
                        ui.label(i.to_string());
                    });
                    for feature in Feature::ALL {
                        row.col(|ui| {
                            ui.label(record.get(feature).to_string());
                        });
                    }
                });
            });
    });
}

fn prediction_table(ui: &mut Ui, labels: &[Species], colors: &SpeciesColors) {
    ui.push_id("prediction_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(220.0)
            .column(Column::auto().at_least(32.0))
            .column(Column::auto().at_least(140.0))
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                header.col(|ui| {
                    ui.strong("Prediction");
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, labels.len(), |mut row| {
                    let i = row.index();
                    let species = labels[i];
                    row.col(|ui| {
                        ui.label(i.to_string());
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(species.label()).color(colors.color_for(species)));
                    });
                });
            });
    });
}

// ---------------------------------------------------------------------------
// About tab
// ---------------------------------------------------------------------------

fn about_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("📘 About Model");

    // Only describe the model once a prediction has loaded it.
    let loaded = state.model.is_loaded().then(|| state.model.get().ok()).flatten();
    let algorithm = match loaded {
        Some(model) => model.estimator.name().to_string(),
        None => "Support Vector Machine (loaded on first prediction)".to_string(),
    };
    ui.label(format!("• Algorithm: {algorithm}"));

    let features: Vec<&str> = Feature::ALL
        .iter()
        .map(|f| f.label().trim_end_matches(" (cm)"))
        .collect();
    ui.label(format!("• Features: {}", features.join(", ")));

    ui.label("• Output Classes:");
    for (species, icon) in Species::ALL.into_iter().zip(["🌱", "🌿", "🌸"]) {
        ui.label(format!("    {icon} {}", species.label()));
    }
    ui.label(format!(
        "• Model trained offline and saved as {}",
        state.model.path().display()
    ));
}
