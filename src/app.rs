use eframe::egui;

use crate::color::SeriesColors;
use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyBondsApp {
    pub state: AppState,
    colors: SeriesColors,
}

impl RustyBondsApp {
    pub fn new(config: &ViewerConfig) -> Self {
        let mut state = AppState::new(config.as_of);
        if let Some(path) = &config.initial_file {
            state.load_path(path);
        }
        Self {
            state,
            colors: SeriesColors::default(),
        }
    }
}

impl eframe::App for RustyBondsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection ----
        egui::SidePanel::left("selection_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Table above the chart ----
        if !self.state.dataset.is_empty() {
            egui::TopBottomPanel::top("table_panel")
                .resizable(true)
                .default_height(260.0)
                .show(ctx, |ui| {
                    table::metrics_table(ui, &mut self.state);
                });
        }

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::metrics_plot(ui, &self.state, &self.colors);
        });
    }
}
