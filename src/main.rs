mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::RustyBondsApp;
use config::ViewerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::from_env().unwrap_or_else(|e| {
        log::warn!("Ignoring configuration: {e}");
        ViewerConfig::default()
    });
    log::info!("Computing metrics as of {}", config.as_of);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Bonds – Bond Metrics Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(RustyBondsApp::new(&config)))),
    )
}
