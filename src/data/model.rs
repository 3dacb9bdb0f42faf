use std::fmt;

use chrono::NaiveDate;

/// Nominal redemption value applied to every bond.
pub const FACE_VALUE: f64 = 100.0;

// ---------------------------------------------------------------------------
// Metric – a derived value that may be unavailable
// ---------------------------------------------------------------------------

/// A derived figure that is either a finite number or "not available".
///
/// The wrapped value is never rounded; rounding only happens in the
/// `display_*` helpers so chained computations and charts keep full precision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Metric {
    Value(f64),
    #[default]
    NotAvailable,
}

impl Metric {
    /// Wrap a raw result, turning `NaN` / `±inf` into [`Metric::NotAvailable`].
    pub fn finite(value: f64) -> Self {
        if value.is_finite() {
            Metric::Value(value)
        } else {
            Metric::NotAvailable
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Metric::Value(_))
    }

    /// Apply `f` to an available value; the result is re-checked for finiteness.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Metric::Value(v) => Metric::finite(f(v)),
            Metric::NotAvailable => Metric::NotAvailable,
        }
    }

    /// `"5.26%"` or `"-"`. The value is expected to already be a percentage.
    pub fn display_percent(&self) -> String {
        match self {
            Metric::Value(v) => format!("{v:.2}%"),
            Metric::NotAvailable => NOT_AVAILABLE.to_string(),
        }
    }

    /// `"7.89"` or `"-"`.
    pub fn display_fixed(&self) -> String {
        self.to_string()
    }
}

/// Marker rendered for metrics that could not be computed.
pub const NOT_AVAILABLE: &str = "-";

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{v:.2}"),
            Metric::NotAvailable => write!(f, "{NOT_AVAILABLE}"),
        }
    }
}

// ---------------------------------------------------------------------------
// BondInput – one parsed record from the source file
// ---------------------------------------------------------------------------

/// A bond as read from a data file, before any analytics.
#[derive(Debug, Clone, PartialEq)]
pub struct BondInput {
    pub symbol: String,
    /// Clean price per 100 face. Not validated: zero, negative or `NaN` are
    /// passed through and degrade the affected metrics.
    pub price: f64,
    /// Annual coupon rate in percent (5.0 means 5%).
    pub coupon_rate: f64,
    /// `None` when the source date could not be read.
    pub maturity: Option<NaiveDate>,
}

impl BondInput {
    pub fn new(
        symbol: impl Into<String>,
        price: f64,
        coupon_rate: f64,
        maturity: Option<NaiveDate>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            coupon_rate,
            maturity,
        }
    }
}

// ---------------------------------------------------------------------------
// BondMetrics – one computed row
// ---------------------------------------------------------------------------

/// Input fields carried through for display plus every derived metric.
#[derive(Debug, Clone, PartialEq)]
pub struct BondMetrics {
    pub symbol: String,
    pub price: f64,
    pub coupon_rate: f64,
    pub maturity: Option<NaiveDate>,
    /// Signed year fraction between the as-of date and maturity.
    pub years_to_maturity: f64,
    /// Coupon paid per year on [`FACE_VALUE`].
    pub annual_coupon: f64,
    /// Approximate yield to maturity as a decimal rate (0.0564 = 5.64%).
    pub approx_ytm: Metric,
    /// Current yield in percent.
    pub current_yield: Metric,
    /// Macaulay duration in years.
    pub macaulay_duration: Metric,
}

impl BondMetrics {
    /// Rebuild the input record this row was computed from.
    pub fn input(&self) -> BondInput {
        BondInput {
            symbol: self.symbol.clone(),
            price: self.price,
            coupon_rate: self.coupon_rate,
            maturity: self.maturity,
        }
    }

    /// Approximate YTM expressed in percent.
    pub fn ytm_percent(&self) -> Metric {
        self.approx_ytm.map(|r| r * 100.0)
    }

    pub fn maturity_label(&self) -> String {
        self.maturity
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

// ---------------------------------------------------------------------------
// BondDataset – the complete computed dataset
// ---------------------------------------------------------------------------

/// All computed bonds for one load, in file order, plus the date they were
/// computed against. Replaced wholesale on reload, never patched.
#[derive(Debug, Clone, PartialEq)]
pub struct BondDataset {
    pub bonds: Vec<BondMetrics>,
    pub as_of: NaiveDate,
}

impl BondDataset {
    pub fn empty(as_of: NaiveDate) -> Self {
        Self {
            bonds: Vec::new(),
            as_of,
        }
    }

    /// Compute every input against `as_of`.
    pub fn from_inputs(inputs: &[BondInput], as_of: NaiveDate) -> Self {
        Self {
            bonds: super::metrics::compute_all(inputs, as_of),
            as_of,
        }
    }

    /// Recompute the whole dataset for a different as-of date.
    pub fn recomputed(&self, as_of: NaiveDate) -> Self {
        let inputs: Vec<BondInput> = self.bonds.iter().map(BondMetrics::input).collect();
        Self::from_inputs(&inputs, as_of)
    }

    /// Symbols in dataset order, for the selection widget.
    pub fn symbols(&self) -> Vec<String> {
        self.bonds.iter().map(|b| b.symbol.clone()).collect()
    }

    /// Number of bonds.
    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }
}
