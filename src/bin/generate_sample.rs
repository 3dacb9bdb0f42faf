use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Local, Months, NaiveDate};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One output row, with the column names the viewer expects.
#[derive(Debug, Clone, Serialize)]
struct SampleBond {
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "Coupon")]
    coupon: f64,
    #[serde(rename = "Maturity")]
    maturity: NaiveDate,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Round to two decimals, as quoted prices are.
fn cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn generate(today: NaiveDate, rng: &mut SimpleRng) -> Vec<SampleBond> {
    // (issuer, coupon %, years to maturity)
    let issues: [(&str, f64, u32); 8] = [
        ("UST", 4.25, 2),
        ("UST", 3.875, 5),
        ("UST", 4.0, 10),
        ("UST", 4.5, 30),
        ("BUND", 2.3, 7),
        ("CORP", 6.5, 4),
        ("CORP", 5.125, 12),
        ("STRIP", 0.0, 8),
    ];

    let mut bonds: Vec<SampleBond> = issues
        .iter()
        .filter_map(|&(issuer, coupon, years)| {
            let maturity = today.checked_add_months(Months::new(12 * years))?;
            // Rough price around par, lower for zero coupons and long maturities.
            let base = if coupon == 0.0 {
                100.0 / 1.04f64.powi(years as i32)
            } else {
                100.0 + (coupon - 4.2) * years as f64 * 0.8
            };
            Some(SampleBond {
                symbol: format!("{issuer}{years}Y"),
                price: cents(base + rng.uniform(-1.5, 1.5)),
                coupon,
                maturity,
            })
        })
        .collect();

    // Edge cases: one already matured, one maturing today.
    if let Some(matured) = today.checked_sub_months(Months::new(18)) {
        bonds.push(SampleBond {
            symbol: "OLD1".to_string(),
            price: 100.0,
            coupon: 3.0,
            maturity: matured,
        });
    }
    bonds.push(SampleBond {
        symbol: "TODAY".to_string(),
        price: cents(99.5 + rng.uniform(0.0, 0.5)),
        coupon: 1.5,
        maturity: today,
    });

    bonds
}

fn write_csv(path: &str, bonds: &[SampleBond]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for bond in bonds {
        writer.serialize(bond).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_json(path: &str, bonds: &[SampleBond]) -> Result<()> {
    let text = serde_json::to_string_pretty(bonds).context("serialising JSON")?;
    std::fs::write(path, text).context("writing JSON")?;
    Ok(())
}

fn write_parquet(path: &str, bonds: &[SampleBond]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch date")?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("Symbol", DataType::Utf8, false),
        Field::new("Price", DataType::Float64, false),
        Field::new("Coupon", DataType::Float64, false),
        Field::new("Maturity", DataType::Date32, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                bonds.iter().map(|b| b.symbol.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                bonds.iter().map(|b| b.price).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                bonds.iter().map(|b| b.coupon).collect::<Vec<_>>(),
            )),
            Arc::new(Date32Array::from(
                bonds
                    .iter()
                    .map(|b| (b.maturity - epoch).num_days() as i32)
                    .collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let today = Local::now().date_naive();
    let mut rng = SimpleRng::new(42);
    let bonds = generate(today, &mut rng);

    write_csv("sample_bonds.csv", &bonds)?;
    write_json("sample_bonds.json", &bonds)?;
    write_parquet("sample_bonds.parquet", &bonds)?;

    println!(
        "Wrote {} bonds (as of {today}) to sample_bonds.csv, sample_bonds.json and sample_bonds.parquet",
        bonds.len()
    );
    Ok(())
}
