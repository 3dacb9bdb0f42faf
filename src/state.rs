use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::data::loader;
use crate::data::model::{BondDataset, BondInput};
use crate::data::selection::{Selection, SeriesSet, aggregate, select_all};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Computed bonds for the last successful load (empty until then).
    pub dataset: BondDataset,

    /// Symbols currently charted.
    pub selection: Selection,

    /// Chart series for `selection` (cached).
    pub series: SeriesSet,

    /// Date metrics are computed against.
    pub as_of: NaiveDate,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the calculation explanation is expanded.
    pub show_explanation: bool,
}

impl AppState {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            dataset: BondDataset::empty(as_of),
            selection: Selection::new(),
            series: SeriesSet::default(),
            as_of,
            source: None,
            status_message: None,
            show_explanation: false,
        }
    }

    /// Replace the dataset with freshly computed metrics for `inputs`.
    ///
    /// The selection starts with every bond selected.
    pub fn set_inputs(&mut self, inputs: &[BondInput]) {
        self.dataset = BondDataset::from_inputs(inputs, self.as_of);
        self.selection = select_all(&self.dataset);
        self.reselect();
        self.status_message = None;
    }

    /// Load `path` and replace the dataset. On failure the previous dataset
    /// is kept and the error is shown as the status message.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(inputs) => {
                log::info!("Loaded {} bonds from {}", inputs.len(), path.display());
                self.set_inputs(&inputs);
                self.source = Some(path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute every bond against a new as-of date, keeping the selection.
    pub fn set_as_of(&mut self, as_of: NaiveDate) {
        if as_of == self.dataset.as_of && as_of == self.as_of {
            return;
        }
        log::debug!("As-of date changed to {as_of}");
        self.as_of = as_of;
        self.dataset = self.dataset.recomputed(as_of);
        self.reselect();
    }

    /// Recompute `series` after a selection change.
    pub fn reselect(&mut self) {
        self.series = aggregate(&self.dataset, &self.selection);
    }

    /// Toggle a single symbol in the selection.
    pub fn toggle_symbol(&mut self, symbol: &str) {
        if !self.selection.remove(symbol) {
            self.selection.insert(symbol.to_string());
        }
        self.reselect();
    }

    /// Select every bond.
    pub fn select_all(&mut self) {
        self.selection = select_all(&self.dataset);
        self.reselect();
    }

    /// Deselect every bond.
    pub fn select_none(&mut self) {
        self.selection.clear();
        self.reselect();
    }
}
