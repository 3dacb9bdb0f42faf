//! Per-bond analytics: time to maturity, approximate YTM, current yield and
//! Macaulay duration.
//!
//! ## Formulas
//!
//! ```text
//! n    = (maturity - as_of) in days / 365.25
//! C    = F × coupon_rate / 100                    (F = 100)
//! YTM  ≈ (C + (F - P) / n) / ((F + P) / 2)
//! CY   = C / P × 100
//! D    = Σ t·PV_t / Σ PV_t,  PV_t = CF_t / (1 + r)^t,  t = 1..=round(n)
//! ```
//!
//! Every function is pure. Results that are not finite come back as
//! [`Metric::NotAvailable`] instead of an error, so one bad bond never stops a
//! batch.

use chrono::NaiveDate;

use super::model::{BondInput, BondMetrics, Metric, FACE_VALUE};

/// Average calendar year length used to turn days into years.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Signed year fraction from `as_of` to `maturity`.
///
/// Negative for matured bonds, zero when maturing on `as_of`, `NaN` when the
/// maturity date is unknown.
pub fn years_to_maturity(maturity: Option<NaiveDate>, as_of: NaiveDate) -> f64 {
    match maturity {
        Some(m) => (m - as_of).num_days() as f64 / DAYS_PER_YEAR,
        None => f64::NAN,
    }
}

/// Coupon paid per year on [`FACE_VALUE`] for a rate given in percent.
pub fn annual_coupon(coupon_rate: f64) -> f64 {
    FACE_VALUE * (coupon_rate / 100.0)
}

/// Closed-form YTM approximation, as a decimal rate.
///
/// Not available when `years` is zero (the formula divides by it), when any
/// input is non-finite, or when the price is zero. Negative prices go through
/// the formula unchanged.
pub fn approx_ytm(annual_coupon: f64, price: f64, years: f64) -> Metric {
    if price == 0.0 {
        return Metric::NotAvailable;
    }
    let ytm = (annual_coupon + (FACE_VALUE - price) / years) / ((FACE_VALUE + price) / 2.0);
    Metric::finite(ytm)
}

/// Annual coupon over price, in percent.
pub fn current_yield(annual_coupon: f64, price: f64) -> Metric {
    Metric::finite(annual_coupon / price * 100.0)
}

/// Macaulay duration over whole annual periods.
///
/// `years` is rounded to the nearest integer to get the number of coupon
/// periods; the last period also pays back [`FACE_VALUE`]. `rate` is the
/// annual discount rate as a decimal. Not available when there is no whole
/// period, when the present values do not sum to a positive number, or when
/// the result is not finite.
pub fn macaulay_duration(annual_coupon: f64, years: f64, rate: f64) -> Metric {
    let periods = years.round();
    if periods.is_nan() || periods < 1.0 {
        return Metric::NotAvailable;
    }
    let periods = periods as u32;

    let mut weighted = 0.0;
    let mut total_pv = 0.0;
    for t in 1..=periods {
        let cash_flow = if t == periods {
            annual_coupon + FACE_VALUE
        } else {
            annual_coupon
        };
        let pv = cash_flow / (1.0 + rate).powi(t as i32);
        weighted += t as f64 * pv;
        total_pv += pv;
    }

    if total_pv.is_nan() || total_pv <= 0.0 {
        return Metric::NotAvailable;
    }
    Metric::finite(weighted / total_pv)
}

/// Derive every metric for one bond.
///
/// When YTM is not available the duration is still computed, discounting at
/// 0% instead.
pub fn compute_metrics(input: &BondInput, as_of: NaiveDate) -> BondMetrics {
    let years = years_to_maturity(input.maturity, as_of);
    let coupon = annual_coupon(input.coupon_rate);

    let ytm = approx_ytm(coupon, input.price, years);
    let discount_rate = ytm.value().unwrap_or(0.0);

    BondMetrics {
        symbol: input.symbol.clone(),
        price: input.price,
        coupon_rate: input.coupon_rate,
        maturity: input.maturity,
        years_to_maturity: years,
        annual_coupon: coupon,
        approx_ytm: ytm,
        current_yield: current_yield(coupon, input.price),
        macaulay_duration: macaulay_duration(coupon, years, discount_rate),
    }
}

/// Compute a whole batch, preserving input order.
pub fn compute_all(inputs: &[BondInput], as_of: NaiveDate) -> Vec<BondMetrics> {
    let bonds: Vec<BondMetrics> = inputs.iter().map(|i| compute_metrics(i, as_of)).collect();
    let incomplete = bonds
        .iter()
        .filter(|b| {
            !(b.approx_ytm.is_available()
                && b.current_yield.is_available()
                && b.macaulay_duration.is_available())
        })
        .count();
    log::debug!(
        "Computed metrics for {} bonds as of {as_of} ({incomplete} with unavailable metrics)",
        bonds.len()
    );
    bonds
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Months;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn years_after(years: u32) -> Option<NaiveDate> {
        as_of().checked_add_months(Months::new(12 * years))
    }

    #[test]
    fn test_years_to_maturity_signs() {
        assert_relative_eq!(
            years_to_maturity(years_after(10), as_of()),
            10.0,
            epsilon = 0.01
        );
        assert_eq!(years_to_maturity(Some(as_of()), as_of()), 0.0);

        let matured = NaiveDate::from_ymd_opt(2022, 3, 15);
        assert!(years_to_maturity(matured, as_of()) < -1.9);
        assert!(years_to_maturity(None, as_of()).is_nan());
    }

    #[test]
    fn test_years_to_maturity_fractional() {
        let half = NaiveDate::from_ymd_opt(2024, 9, 14);
        let n = years_to_maturity(half, as_of());
        assert_relative_eq!(n, 183.0 / 365.25, epsilon = 1e-12);
    }

    #[test]
    fn test_annual_coupon_on_face_100() {
        assert_eq!(annual_coupon(5.0), 5.0);
        assert_eq!(annual_coupon(0.0), 0.0);
        assert_relative_eq!(annual_coupon(3.375), 3.375, epsilon = 1e-12);
    }

    #[test]
    fn test_discount_bond_example() {
        // 95 price, 5% coupon, 10 years
        let input = BondInput::new("DISC", 95.0, 5.0, years_after(10));
        let m = compute_metrics(&input, as_of());

        assert_eq!(m.annual_coupon, 5.0);
        assert_relative_eq!(
            m.approx_ytm.value().unwrap(),
            5.5 / 97.5,
            epsilon = 1e-4
        );
        assert_eq!(m.ytm_percent().display_percent(), "5.64%");
        assert_eq!(m.current_yield.display_percent(), "5.26%");

        let d = m.macaulay_duration.value().unwrap();
        assert!(d > 7.0 && d < 9.0, "duration {d}");
    }

    #[test]
    fn test_zero_coupon_at_par() {
        let input = BondInput::new("ZERO", 100.0, 0.0, years_after(5));
        let m = compute_metrics(&input, as_of());

        assert_eq!(m.current_yield, Metric::Value(0.0));
        assert_eq!(m.current_yield.display_percent(), "0.00%");
        assert_relative_eq!(m.approx_ytm.value().unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(m.ytm_percent().display_percent(), "0.00%");
        assert_relative_eq!(m.macaulay_duration.value().unwrap(), 5.0, epsilon = 1e-12);
        assert_eq!(m.macaulay_duration.display_fixed(), "5.00");
    }

    #[test]
    fn test_maturing_today() {
        let input = BondInput::new("TODAY", 98.0, 4.0, Some(as_of()));
        let m = compute_metrics(&input, as_of());

        assert_eq!(m.years_to_maturity, 0.0);
        assert_eq!(m.approx_ytm, Metric::NotAvailable);
        assert_eq!(m.macaulay_duration, Metric::NotAvailable);
        assert_relative_eq!(
            m.current_yield.value().unwrap(),
            4.0 / 98.0 * 100.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_price() {
        let input = BondInput::new("FREE", 0.0, 5.0, years_after(10));
        let m = compute_metrics(&input, as_of());

        assert_eq!(m.current_yield, Metric::NotAvailable);
        assert_eq!(m.approx_ytm, Metric::NotAvailable);

        // Duration falls back to a 0% discount rate:
        // (5·(1+…+10) + 10·100) / (10·5 + 100) = 1275 / 150
        assert_relative_eq!(
            m.macaulay_duration.value().unwrap(),
            1275.0 / 150.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_negative_price() {
        let input = BondInput::new("NEG", -50.0, 5.0, years_after(10));
        let m = compute_metrics(&input, as_of());
        let n = m.years_to_maturity;

        let ytm = m.approx_ytm.value().unwrap();
        assert_relative_eq!(ytm, (5.0 + 150.0 / n) / 25.0, epsilon = 1e-12);
        assert_relative_eq!(ytm, 0.8, epsilon = 1e-3);
        assert_eq!(m.current_yield, Metric::Value(-10.0));
        assert_eq!(m.macaulay_duration, macaulay_duration(5.0, n, ytm));
        assert!(m.macaulay_duration.is_available());
    }

    #[test]
    fn test_matured_bond() {
        let matured = NaiveDate::from_ymd_opt(2020, 1, 1);
        let input = BondInput::new("OLD", 101.0, 6.0, matured);
        let m = compute_metrics(&input, as_of());

        assert!(m.years_to_maturity < 0.0);
        // The approximation itself is finite for a matured bond.
        assert!(m.approx_ytm.is_available());
        assert_eq!(m.macaulay_duration, Metric::NotAvailable);
        assert!(m.current_yield.is_available());
    }

    #[test]
    fn test_short_bond_rounds_to_zero_periods() {
        let soon = NaiveDate::from_ymd_opt(2024, 6, 1);
        let input = BondInput::new("SOON", 99.5, 2.0, soon);
        let m = compute_metrics(&input, as_of());

        assert!(m.years_to_maturity > 0.0 && m.years_to_maturity < 0.5);
        assert!(m.approx_ytm.is_available());
        assert_eq!(m.macaulay_duration, Metric::NotAvailable);
    }

    #[test]
    fn test_fractional_years_round_to_nearest_period() {
        // ~2.6 years rounds to 3 periods; at 0% the duration is (c·(1+2)+3·(c+100))/(3c+100).
        let d = macaulay_duration(4.0, 2.6, 0.0).value().unwrap();
        assert_relative_eq!(d, (4.0 * 3.0 + 3.0 * 104.0) / 112.0, epsilon = 1e-12);

        let d = macaulay_duration(4.0, 2.4, 0.0).value().unwrap();
        assert_relative_eq!(d, (4.0 + 2.0 * 104.0) / 108.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_maturity_degrades_per_field() {
        let input = BondInput::new("NODATE", 97.0, 3.0, None);
        let m = compute_metrics(&input, as_of());

        assert!(m.years_to_maturity.is_nan());
        assert_eq!(m.approx_ytm, Metric::NotAvailable);
        assert_eq!(m.macaulay_duration, Metric::NotAvailable);
        assert!(m.current_yield.is_available());
    }

    #[test]
    fn test_nan_inputs_do_not_panic() {
        let input = BondInput::new("NAN", f64::NAN, f64::NAN, years_after(3));
        let m = compute_metrics(&input, as_of());

        assert_eq!(m.approx_ytm, Metric::NotAvailable);
        assert_eq!(m.current_yield, Metric::NotAvailable);
        assert_eq!(m.macaulay_duration, Metric::NotAvailable);
    }

    #[test]
    fn test_duration_rate_of_minus_one_is_not_available() {
        assert_eq!(macaulay_duration(5.0, 3.0, -1.0), Metric::NotAvailable);
    }

    #[test]
    fn test_duration_matches_reference_value() {
        // 5-year annual 5% bond discounted at 5%: D ≈ 4.5460
        let d = macaulay_duration(5.0, 5.0, 0.05).value().unwrap();
        assert_relative_eq!(d, 4.5460, epsilon = 1e-4);
    }

    #[test]
    fn test_positive_inputs_give_bounded_duration() {
        for &(price, coupon, years) in &[
            (95.0, 5.0, 10),
            (120.0, 8.0, 3),
            (60.0, 0.5, 30),
            (100.0, 0.0, 1),
            (101.25, 2.75, 7),
        ] {
            let input = BondInput::new("P", price, coupon, years_after(years));
            let m = compute_metrics(&input, as_of());
            let rounded = m.years_to_maturity.round();

            assert!(m.approx_ytm.is_available());
            let d = m.macaulay_duration.value().unwrap();
            assert!(d > 0.0 && d <= rounded + 1e-12, "duration {d} for {years}y");
        }
    }

    #[test]
    fn test_compute_is_idempotent_and_ordered() {
        let inputs = vec![
            BondInput::new("B", 95.0, 5.0, years_after(10)),
            BondInput::new("A", 0.0, 5.0, years_after(2)),
            BondInput::new("C", 100.0, 0.0, Some(as_of())),
        ];
        let first = compute_all(&inputs, as_of());
        let second = compute_all(&inputs, as_of());

        assert_eq!(first, second);
        let symbols: Vec<&str> = first.iter().map(|b| b.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["B", "A", "C"]);
    }
}
