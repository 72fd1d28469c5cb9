use std::time::Instant;

use eframe::egui;

use crate::color::SpeciesColors;
use crate::state::AppState;
use crate::ui::{panels, results};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct IrisDashboardApp {
    pub state: AppState,
    colors: SpeciesColors,
}

impl IrisDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            colors: SpeciesColors::default(),
        }
    }
}

impl Default for IrisDashboardApp {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl eframe::App for IrisDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Finish a prediction whose spinner delay has run out.
        self.state.poll_prediction(Instant::now());

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: inputs ----
        egui::SidePanel::left("input_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: data and results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            results::central_panel(ui, &mut self.state, &self.colors);
        });

        // Keep the spinner animating while waiting.
        if let Some(pending) = &self.state.pending {
            let remaining = self
                .state
                .config
                .prediction_delay
                .saturating_sub(pending.started.elapsed());
            ctx.request_repaint_after(remaining.min(std::time::Duration::from_millis(100)));
        }
    }
}
