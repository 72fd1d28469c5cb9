mod app;
mod classifier;
mod color;
mod config;
mod data;
mod error;
mod predict;
mod report;
mod state;
mod ui;

use app::IrisDashboardApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let app = IrisDashboardApp::default();
    let config = app.state.config.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window_title.clone())
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        &config.window_title,
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render png/jpg/etc.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
}
