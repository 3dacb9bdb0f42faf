use eframe::egui::{self, Sense, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{BondMetrics, NOT_AVAILABLE};
use crate::state::AppState;

const HEADERS: [&str; 7] = [
    "Symbol",
    "Price",
    "Coupon (%)",
    "Maturity",
    "YTM",
    "Current Yield",
    "Duration (years)",
];

// ---------------------------------------------------------------------------
// Metrics table (central panel, top)
// ---------------------------------------------------------------------------

/// One row per bond in file order. Clicking a row toggles it in the chart.
pub fn metrics_table(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_empty() {
        return;
    }

    let mut toggled: Option<String> = None;
    let bonds = &state.dataset.bonds;
    let selection = &state.selection;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(80.0), HEADERS.len())
        .min_scrolled_height(0.0)
        .header(22.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(20.0, bonds.len(), |mut row| {
                let bond = &bonds[row.index()];
                row.set_selected(selection.contains(&bond.symbol));
                for cell in row_cells(bond) {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
                if row.response().clicked() {
                    toggled = Some(bond.symbol.clone());
                }
            });
        });

    if let Some(symbol) = toggled {
        state.toggle_symbol(&symbol);
    }
}

/// Display strings for one bond, matching [`HEADERS`].
pub fn row_cells(bond: &BondMetrics) -> [String; 7] {
    [
        bond.symbol.clone(),
        input_number(bond.price),
        input_number(bond.coupon_rate),
        bond.maturity_label(),
        bond.ytm_percent().display_percent(),
        bond.current_yield.display_percent(),
        bond.macaulay_duration.display_fixed(),
    ]
}

fn input_number(v: f64) -> String {
    if v.is_finite() {
        format!("{v}")
    } else {
        NOT_AVAILABLE.to_string()
    }
}
