use std::collections::BTreeSet;

use super::model::{BondDataset, Metric};

// ---------------------------------------------------------------------------
// Selection: which bonds are charted
// ---------------------------------------------------------------------------

/// The set of selected symbols. An empty set means nothing is charted.
pub type Selection = BTreeSet<String>;

/// Initialise a [`Selection`] with every symbol of the dataset selected.
pub fn select_all(dataset: &BondDataset) -> Selection {
    dataset.bonds.iter().map(|b| b.symbol.clone()).collect()
}

// ---------------------------------------------------------------------------
// SeriesSet: parallel chart series for the selected bonds
// ---------------------------------------------------------------------------

/// Four equal-length series, one entry per selected bond in dataset order.
///
/// Values are unrounded; a bond whose metric is unavailable keeps its slot
/// with [`Metric::NotAvailable`] so indices stay aligned with `labels`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    pub labels: Vec<String>,
    /// Approximate YTM in percent.
    pub ytm: Vec<Metric>,
    /// Current yield in percent.
    pub current_yield: Vec<Metric>,
    /// Macaulay duration in years.
    pub duration: Vec<Metric>,
}

/// One of the charted metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeriesKind {
    Ytm,
    CurrentYield,
    Duration,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 3] = [SeriesKind::Ytm, SeriesKind::CurrentYield, SeriesKind::Duration];

    /// Legend label.
    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::Ytm => "YTM (%)",
            SeriesKind::CurrentYield => "Current Yield (%)",
            SeriesKind::Duration => "Duration (years)",
        }
    }
}

impl SeriesSet {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn values(&self, kind: SeriesKind) -> &[Metric] {
        match kind {
            SeriesKind::Ytm => &self.ytm,
            SeriesKind::CurrentYield => &self.current_yield,
            SeriesKind::Duration => &self.duration,
        }
    }

    /// `[x, y]` points for one series, x being the position in `labels`.
    /// Unavailable values are skipped.
    pub fn points(&self, kind: SeriesKind) -> Vec<[f64; 2]> {
        self.values(kind)
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.value().map(|v| [i as f64, v]))
            .collect()
    }
}

/// Collect the chart series for bonds whose symbol is in `selection`.
///
/// Order follows the dataset, not the selection. The dataset is only read.
pub fn aggregate(dataset: &BondDataset, selection: &Selection) -> SeriesSet {
    let mut series = SeriesSet::default();
    if selection.is_empty() {
        return series;
    }
    for bond in dataset
        .bonds
        .iter()
        .filter(|b| selection.contains(&b.symbol))
    {
        series.labels.push(bond.symbol.clone());
        series.ytm.push(bond.ytm_percent());
        series.current_yield.push(bond.current_yield);
        series.duration.push(bond.macaulay_duration);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::BondInput;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset() -> BondDataset {
        let as_of = date(2024, 1, 1);
        BondDataset::from_inputs(
            &[
                BondInput::new("UST30", 88.0, 3.0, Some(date(2054, 1, 1))),
                BondInput::new("CORP5", 102.0, 6.0, Some(date(2029, 1, 1))),
                BondInput::new("TODAY", 99.0, 4.0, Some(as_of)),
                BondInput::new("ZERO", 100.0, 0.0, Some(date(2029, 1, 1))),
            ],
            as_of,
        )
    }

    fn selection(symbols: &[&str]) -> Selection {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_selection_yields_empty_series() {
        let series = aggregate(&dataset(), &Selection::new());
        assert!(series.is_empty());
        assert!(series.ytm.is_empty());
        assert!(series.current_yield.is_empty());
        assert!(series.duration.is_empty());
    }

    #[test]
    fn test_keeps_dataset_order() {
        let series = aggregate(&dataset(), &selection(&["ZERO", "UST30"]));
        assert_eq!(series.labels, vec!["UST30".to_string(), "ZERO".to_string()]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.ytm.len(), 2);
        assert_eq!(series.current_yield.len(), 2);
        assert_eq!(series.duration.len(), 2);
    }

    #[test]
    fn test_values_match_dataset_unrounded() {
        let ds = dataset();
        let series = aggregate(&ds, &selection(&["CORP5"]));
        let corp = &ds.bonds[1];

        assert_eq!(series.ytm[0], corp.ytm_percent());
        assert_eq!(series.current_yield[0], corp.current_yield);
        assert_eq!(series.duration[0], corp.macaulay_duration);
        // 6 / 102 × 100 = 5.88235…, not the rounded 5.88
        assert_eq!(series.current_yield[0].value(), Some(6.0 / 102.0 * 100.0));
    }

    #[test]
    fn test_unavailable_metrics_keep_their_slot() {
        let series = aggregate(&dataset(), &selection(&["TODAY", "ZERO"]));
        assert_eq!(series.labels, vec!["TODAY".to_string(), "ZERO".to_string()]);
        assert_eq!(series.ytm[0], Metric::NotAvailable);
        assert_eq!(series.duration[0], Metric::NotAvailable);
        assert!(series.current_yield[0].is_available());
        assert_eq!(series.ytm[1], Metric::Value(0.0));
    }

    #[test]
    fn test_unknown_symbols_are_ignored() {
        let series = aggregate(&dataset(), &selection(&["NOPE", "CORP5"]));
        assert_eq!(series.labels, vec!["CORP5".to_string()]);
    }

    #[test]
    fn test_membership_matches_filter_for_every_subset() {
        let ds = dataset();
        let symbols = ds.symbols();
        for mask in 0u32..(1 << symbols.len()) {
            let sel: Selection = symbols
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, s)| s.clone())
                .collect();

            let expected: Vec<String> = symbols
                .iter()
                .filter(|s| sel.contains(*s))
                .cloned()
                .collect();
            let series = aggregate(&ds, &sel);

            assert_eq!(series.labels, expected);
            assert_eq!(series, aggregate(&ds, &sel));
        }
    }

    #[test]
    fn test_points_skip_unavailable_but_keep_positions() {
        let series = aggregate(&dataset(), &selection(&["CORP5", "TODAY", "ZERO"]));
        let ytm = series.points(SeriesKind::Ytm);

        assert_eq!(ytm.len(), 2);
        assert_eq!(ytm[0][0], 0.0);
        assert_eq!(ytm[1], [2.0, 0.0]);
        assert_eq!(series.points(SeriesKind::CurrentYield).len(), 3);
        assert_eq!(series.values(SeriesKind::Duration), series.duration.as_slice());
    }

    #[test]
    fn test_series_labels() {
        let labels: Vec<&str> = SeriesKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["YTM (%)", "Current Yield (%)", "Duration (years)"]);
    }

    #[test]
    fn test_select_all_and_dataset_untouched() {
        let ds = dataset();
        let before = ds.clone();
        let all = select_all(&ds);
        let series = aggregate(&ds, &all);

        assert_eq!(series.labels, ds.symbols());
        assert_eq!(ds, before);
    }
}
