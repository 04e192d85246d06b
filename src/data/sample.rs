//! Synthetic daily price generation.
//!
//! A seeded geometric random walk over consecutive calendar days, written in
//! the ingest schema (`Date,High`). The point is a deterministic dataset for
//! trying the viewer without real market data, not a realistic simulator.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{PricePoint, PriceSeries};
use crate::error::AppError;

/// First date of every generated series. Fixed so that equal parameters
/// produce byte-identical files.
const SAMPLE_START: (i32, u32, u32) = (2020, 1, 1);

/// Parameters of the random walk.
#[derive(Debug, Clone, Copy)]
pub struct SampleParams {
    pub days: usize,
    pub seed: u64,
    pub start_price: f64,
    /// Daily log-return volatility.
    pub daily_vol: f64,
    /// Daily log-return drift.
    pub drift: f64,
}

/// Generate a deterministic synthetic price series.
pub fn generate_price_series(params: &SampleParams) -> Result<PriceSeries, AppError> {
    if !(params.start_price.is_finite() && params.start_price > 0.0) {
        return Err(AppError::usage("Sample start price must be finite and > 0."));
    }
    if !(params.daily_vol.is_finite() && params.daily_vol >= 0.0) {
        return Err(AppError::usage("Sample volatility must be finite and >= 0."));
    }
    if !params.drift.is_finite() {
        return Err(AppError::usage("Sample drift must be finite."));
    }

    let (y, m, d) = SAMPLE_START;
    let start_date = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);

    let mut rng = StdRng::seed_from_u64(params.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::usage(format!("Noise distribution error: {e}")))?;

    let mut points = Vec::with_capacity(params.days);
    let mut level = params.start_price;

    for i in 0..params.days {
        let date = start_date + Duration::days(i as i64);
        points.push(PricePoint { date, value: level });

        // Itô-corrected log step keeps the expected level at
        // start_price * exp(drift * t).
        let z: f64 = normal.sample(&mut rng);
        let step = params.drift - 0.5 * params.daily_vol * params.daily_vol + params.daily_vol * z;
        level *= step.exp();
    }

    Ok(PriceSeries::new(points))
}

/// Write a generated series as a CSV in the ingest schema.
pub fn write_sample_csv(path: &Path, series: &PriceSeries) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create sample CSV '{}': {e}", path.display())))?;

    writeln!(file, "Date,High")
        .map_err(|e| AppError::io(format!("Failed to write sample CSV header: {e}")))?;

    for p in &series.points {
        writeln!(file, "{},{:.4}", p.date, p.value)
            .map_err(|e| AppError::io(format!("Failed to write sample CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SampleParams {
        SampleParams {
            days: 30,
            seed: 7,
            start_price: 100.0,
            daily_vol: 0.02,
            drift: 0.0005,
        }
    }

    #[test]
    fn same_seed_same_series() {
        let a = generate_price_series(&params()).unwrap();
        let b = generate_price_series(&params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_series() {
        let a = generate_price_series(&params()).unwrap();
        let b = generate_price_series(&SampleParams { seed: 8, ..params() }).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn dates_are_consecutive_and_prices_positive() {
        let series = generate_price_series(&params()).unwrap();
        assert_eq!(series.len(), 30);
        for pair in series.points.windows(2) {
            assert_eq!((pair[1].date - pair[0].date).num_days(), 1);
        }
        assert!(series.values().all(|v| v > 0.0));
    }

    #[test]
    fn zero_days_is_an_empty_series() {
        let series = generate_price_series(&SampleParams { days: 0, ..params() }).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn bad_parameters_are_rejected() {
        assert!(generate_price_series(&SampleParams { start_price: 0.0, ..params() }).is_err());
        assert!(generate_price_series(&SampleParams { daily_vol: f64::NAN, ..params() }).is_err());
    }
}
