use eframe::egui::{RichText, Ui};
use egui_plot::{Corner, GridMark, Legend, Line, Plot, Points, uniform_grid_spacer};

use crate::color::SeriesColors;
use crate::data::selection::SeriesKind;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Metrics chart (central panel, below the table)
// ---------------------------------------------------------------------------

/// Render one line per metric over the selected bonds.
pub fn metrics_plot(ui: &mut Ui, state: &AppState, colors: &SeriesColors) {
    if state.dataset.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view bonds  (File → Open…)");
        });
        return;
    }

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("Bond indicators by symbol").strong());
    });

    if state.series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Select bonds in the side panel to chart them.");
        });
        return;
    }

    let labels = &state.series.labels;

    Plot::new("metrics_plot")
        .legend(Legend::default().position(Corner::LeftTop))
        .x_axis_label("Bond")
        .y_axis_label("% / years")
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark: GridMark, _range| symbol_at(labels, mark.value))
        .include_y(0.0)
        .include_x(-0.5)
        .include_x(labels.len() as f64 - 0.5)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for kind in SeriesKind::ALL {
                let points = state.series.points(kind);
                let color = colors.color_for(kind);

                plot_ui.line(
                    Line::new(points.clone())
                        .name(kind.label())
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(points)
                        .name(kind.label())
                        .color(color)
                        .radius(3.5),
                );
            }
        });
}

/// Axis label for an x position: the symbol when it falls on a bond.
fn symbol_at(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
