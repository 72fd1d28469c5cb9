use std::time::Instant;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::input;
use crate::data::model::Feature;
use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – input widgets
// ---------------------------------------------------------------------------

/// Render the left input panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.strong("📂 Choose an option:");
    egui::ComboBox::from_id_salt("page_select")
        .selected_text(state.page.title())
        .show_ui(ui, |ui: &mut Ui| {
            for page in Page::ALL {
                ui.selectable_value(&mut state.page, page, page.title());
            }
        });
    ui.separator();

    if state.page != Page::IrisPrediction {
        return;
    }

    ui.heading("📥 User Input Features");
    ui.add_space(4.0);

    ui.horizontal(|ui: &mut Ui| {
        if ui
            .button("Upload file…")
            .on_hover_text("Upload your input CSV file here")
            .clicked()
        {
            open_file_dialog(state);
        }
        if state.upload.is_some() && ui.small_button("Clear").clicked() {
            state.clear_upload();
        }
    });

    let upload_label = state
        .upload
        .as_ref()
        .map(|u| format!("{} ({} rows)", u.file_name(), u.batch.len()));
    match upload_label {
        Some(label) => {
            ui.label(label);
        }
        None => manual_controls(ui, state),
    }

    ui.separator();

    let pending = state.is_pending();
    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(!pending, egui::Button::new("🚀 Predict!"))
            .clicked()
        {
            state.request_prediction(Instant::now());
        }
        if pending {
            ui.spinner();
            ui.label("Running prediction…");
        }
    });
}

fn manual_controls(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(4.0);
    ui.strong("🔧 Manual Input");
    for feature in Feature::ALL {
        let mut value = state.manual.get(feature);
        let slider = egui::Slider::new(&mut value, feature.range())
            .step_by(input::STEP)
            .fixed_decimals(1)
            .text(feature.label());
        if ui.add(slider).changed() {
            state.set_manual(feature, input::snap(value));
        }
    }
    if ui.small_button("Reset").clicked() {
        state.reset_manual();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                state.page = Page::IrisPrediction;
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.upload.is_some(), egui::Button::new("Clear upload"))
                .clicked()
            {
                state.clear_upload();
                ui.close_menu();
            }
        });

        ui.separator();

        match &state.upload {
            Some(upload) => ui.label(format!("{} rows uploaded", upload.batch.len())),
            None => ui.label("Manual input"),
        };

        if state.model.is_loaded() {
            ui.separator();
            ui.label("Model loaded");
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload input features")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_upload(&path);
    }
}
