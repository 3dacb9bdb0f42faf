use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::state::AppState;

/// Text behind the "Show explanation" toggle.
pub const EXPLANATION: &str = "\
Face value (F) is 100 for every bond. C = F × coupon / 100 is the annual coupon, \
P the price and n the years to maturity (days / 365.25).

YTM (approximation): (C + (F − P) / n) / ((F + P) / 2). \
Shown as \"-\" when it cannot be computed, e.g. when the bond matures today.

Current yield: C / P × 100.

Macaulay duration: the present-value weighted average time of the cash flows. \
Each whole year t up to round(n) pays C, the last one also repays F, and is \
discounted at (1 + YTM)^t. When YTM is unavailable a 0% rate is used.";

// ---------------------------------------------------------------------------
// Left side panel – bond selection
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Bonds");
    ui.separator();

    explanation(ui, state);
    ui.separator();

    if state.dataset.is_empty() {
        ui.label("No bonds loaded.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    let symbols = state.dataset.symbols();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for symbol in &symbols {
                let mut checked = state.selection.contains(symbol);
                if ui.checkbox(&mut checked, symbol.as_str()).changed() {
                    state.toggle_symbol(symbol);
                }
            }
        });
}

fn explanation(ui: &mut Ui, state: &mut AppState) {
    let label = if state.show_explanation {
        "Hide explanation"
    } else {
        "Show explanation"
    };
    if ui.button(label).clicked() {
        state.show_explanation = !state.show_explanation;
    }
    if state.show_explanation {
        ui.label(RichText::new(EXPLANATION).small());
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
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("As of");
        let mut as_of = state.as_of;
        if ui
            .add(DatePickerButton::new(&mut as_of).id_salt("as_of"))
            .changed()
        {
            state.set_as_of(as_of);
        }

        ui.separator();

        if !state.dataset.is_empty() {
            let source = state
                .source
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| format!(" from {}", n.to_string_lossy()))
                .unwrap_or_default();
            ui.label(format!(
                "{} bonds loaded{source}, {} selected",
                state.dataset.len(),
                state.series.len()
            ));
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
        .set_title("Open bond data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
