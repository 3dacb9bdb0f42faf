use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::BondInput;

pub const SYMBOL_COLUMN: &str = "Symbol";
pub const PRICE_COLUMN: &str = "Price";
pub const COUPON_COLUMN: &str = "Coupon";
pub const MATURITY_COLUMN: &str = "Maturity";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load bond records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Symbol`, `Price`, `Coupon`, `Maturity`
/// * `.json`    – `[{ "Symbol": "...", "Price": 95.2, "Coupon": 5, "Maturity": "2034-05-15" }, ...]`
/// * `.parquet` – columns with the same names
///
/// Unreadable numbers become `NaN` and unreadable dates become `None`; such
/// rows are kept so their metrics degrade individually. Structural problems
/// fail the whole load.
pub fn load_file(path: &Path) -> Result<Vec<BondInput>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let bonds = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    report_suspect_rows(&bonds);
    Ok(bonds)
}

fn report_suspect_rows(bonds: &[BondInput]) {
    let mut seen = BTreeSet::new();
    for (row, bond) in bonds.iter().enumerate() {
        if !seen.insert(bond.symbol.as_str()) {
            log::warn!("Row {row}: duplicate symbol '{}'", bond.symbol);
        }
        if bond.price.is_nan() || bond.coupon_rate.is_nan() {
            log::warn!("Row {row} ({}): unreadable price or coupon", bond.symbol);
        }
        if bond.maturity.is_none() {
            log::warn!("Row {row} ({}): unreadable maturity date", bond.symbol);
        }
    }
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// Lenient number parsing: surrounding whitespace is ignored, anything else
/// that is not a number becomes `NaN`.
pub fn parse_number(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, `YYYY/MM/DD` and `MM/DD/YYYY`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }
    ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "Symbol": "UST10", "Price": 95.0, "Coupon": 5, "Maturity": "2034-05-15" },
///   ...
/// ]
/// ```
///
/// `Price` and `Coupon` may be numbers or numeric strings.
fn load_json(path: &Path) -> Result<Vec<BondInput>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Vec<BondInput>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut bonds = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let symbol = match obj.get(SYMBOL_COLUMN) {
            Some(JsonValue::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(JsonValue::Number(n)) => n.to_string(),
            _ => bail!("Row {i}: missing '{SYMBOL_COLUMN}'"),
        };

        bonds.push(BondInput {
            symbol,
            price: json_to_f64(obj.get(PRICE_COLUMN)),
            coupon_rate: json_to_f64(obj.get(COUPON_COLUMN)),
            maturity: obj
                .get(MATURITY_COLUMN)
                .and_then(|v| v.as_str())
                .and_then(parse_date),
        });
    }

    Ok(bonds)
}

fn json_to_f64(val: Option<&JsonValue>) -> f64 {
    match val {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(JsonValue::String(s)) => parse_number(s),
        _ => f64::NAN,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names in any order. Columns other than
/// `Symbol`, `Price`, `Coupon` and `Maturity` are ignored. Short rows are kept;
/// their missing fields read as unavailable.
fn load_csv(path: &Path) -> Result<Vec<BondInput>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<BondInput>> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let symbol_idx = column(SYMBOL_COLUMN)?;
    let price_idx = column(PRICE_COLUMN)?;
    let coupon_idx = column(COUPON_COLUMN)?;
    let maturity_idx = column(MATURITY_COLUMN)?;

    let mut bonds = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let symbol = record.get(symbol_idx).unwrap_or("");
        if symbol.is_empty() {
            bail!("CSV row {row_no}: empty '{SYMBOL_COLUMN}'");
        }

        bonds.push(BondInput::new(
            symbol,
            parse_number(record.get(price_idx).unwrap_or("")),
            parse_number(record.get(coupon_idx).unwrap_or("")),
            parse_date(record.get(maturity_idx).unwrap_or("")),
        ));
    }

    Ok(bonds)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing bond records.
///
/// Expected schema:
/// - `Symbol`: Utf8 or LargeUtf8
/// - `Price`, `Coupon`: Float64, Float32, Int64 or Int32
/// - `Maturity`: Date32 or a Utf8 date string
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<BondInput>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;
    read_batches(reader)
}

/// Row numbers in errors count across batches, from the start of the file.
fn read_batches(
    batches: impl IntoIterator<Item = std::result::Result<RecordBatch, ArrowError>>,
) -> Result<Vec<BondInput>> {
    let mut bonds = Vec::new();
    let mut offset = 0;

    for batch_result in batches {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &str| {
            schema
                .index_of(name)
                .map(|idx| batch.column(idx))
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))
        };
        let symbol_col = column(SYMBOL_COLUMN)?;
        let price_col = column(PRICE_COLUMN)?;
        let coupon_col = column(COUPON_COLUMN)?;
        let maturity_col = column(MATURITY_COLUMN)?;

        for row in 0..batch.num_rows() {
            let file_row = offset + row;
            let symbol = extract_string(symbol_col, row)
                .with_context(|| format!("Row {file_row}: failed to read '{SYMBOL_COLUMN}'"))?;
            if symbol.is_empty() {
                bail!("Row {file_row}: empty '{SYMBOL_COLUMN}'");
            }

            bonds.push(BondInput {
                symbol,
                price: extract_f64(price_col, row),
                coupon_rate: extract_f64(coupon_col, row),
                maturity: extract_date(maturity_col, row),
            });
        }
        offset += batch.num_rows();
    }

    Ok(bonds)
}

// -- Parquet / Arrow helpers --

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).trim().to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).trim().to_string()),
        other => bail!("Expected Utf8 column, got {other:?}"),
    }
}

/// Numeric cell as `f64`; nulls and unsupported types read as `NaN`.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> f64 {
    if col.is_null(row) {
        return f64::NAN;
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        arr.value(row)
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<StringArray>() {
        parse_number(arr.value(row))
    } else {
        f64::NAN
    }
}

fn extract_date(col: &Arc<dyn Array>, row: usize) -> Option<NaiveDate> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Date32 => col
            .as_any()
            .downcast_ref::<Date32Array>()
            .and_then(|arr| arr.value_as_date(row)),
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .and_then(|arr| parse_date(arr.value(row))),
        DataType::LargeUtf8 => parse_date(col.as_string::<i64>().value(row)),
        _ => None,
    }
}
