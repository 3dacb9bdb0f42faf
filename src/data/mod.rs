/// Data layer: core types, loading, metrics, and selection.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<BondInput>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  metrics  │  BondInput + as-of → BondMetrics  (BondDataset)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ selection  │  selected symbols → SeriesSet for the chart
///   └───────────┘
/// ```

pub mod loader;
pub mod metrics;
pub mod model;
pub mod selection;
