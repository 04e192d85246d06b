//! Derived views of a price series.
//!
//! Three transforms, mirroring the classic pandas trio:
//!
//! - `resample_monthly_mean` maps to `resample('ME').mean()`
//! - `rolling_mean` maps to `rolling(window).mean()`
//! - `diff` maps to `diff()`
//!
//! The identity view is the `PriceSeries` itself; there is no transform for it.
//! All three return empty outputs for an empty input rather than erroring.

use chrono::{Datelike, NaiveDate};

use crate::domain::{
    DerivedPoint, DifferencedSeries, MovingAverageSeries, PricePoint, PriceSeries, ResampledSeries,
};
use crate::error::AppError;

/// Group values by calendar month and average them.
///
/// Output points are labeled with the month-end date and appear in input
/// order (one per month that has at least one observation). Months with no
/// observations produce no entry at all, rather than a zero or NaN
/// placeholder; gaps stay visible as gaps.
pub fn resample_monthly_mean(series: &PriceSeries) -> ResampledSeries {
    let mut points: Vec<PricePoint> = Vec::new();
    // (year, month) of the bucket currently being accumulated.
    let mut current: Option<(i32, u32)> = None;
    let mut sum = 0.0;
    let mut count = 0usize;

    for p in &series.points {
        let bucket = (p.date.year(), p.date.month());
        match current {
            Some(cur) if cur == bucket => {
                sum += p.value;
                count += 1;
            }
            Some((y, m)) => {
                points.push(PricePoint {
                    date: month_end(y, m),
                    value: sum / count as f64,
                });
                current = Some(bucket);
                sum = p.value;
                count = 1;
            }
            None => {
                current = Some(bucket);
                sum = p.value;
                count = 1;
            }
        }
    }

    if let Some((y, m)) = current {
        points.push(PricePoint {
            date: month_end(y, m),
            value: sum / count as f64,
        });
    }

    ResampledSeries { points }
}

/// Trailing mean of the last `window` values, aligned to the input index.
///
/// Positions `0..window-1` are undefined (`None`); from `window-1` on, each
/// value is the arithmetic mean of the trailing `window` raw values. A window
/// larger than the series yields all-`None` (no error), matching pandas.
pub fn rolling_mean(series: &PriceSeries, window: usize) -> Result<MovingAverageSeries, AppError> {
    if window == 0 {
        return Err(AppError::usage("Moving-average window must be >= 1."));
    }

    let mut points = Vec::with_capacity(series.len());
    // Running sum over the trailing window; one add + one subtract per step.
    let mut sum = 0.0;

    for (i, p) in series.points.iter().enumerate() {
        sum += p.value;
        if i >= window {
            sum -= series.points[i - window].value;
        }
        let value = if i + 1 >= window {
            Some(sum / window as f64)
        } else {
            None
        };
        points.push(DerivedPoint { date: p.date, value });
    }

    Ok(MovingAverageSeries { window, points })
}

/// First discrete difference, aligned to the input index.
///
/// `value[i] = raw[i] - raw[i-1]`; position 0 is undefined.
pub fn diff(series: &PriceSeries) -> DifferencedSeries {
    let mut points = Vec::with_capacity(series.len());

    for (i, p) in series.points.iter().enumerate() {
        let value = if i == 0 {
            None
        } else {
            Some(p.value - series.points[i - 1].value)
        };
        points.push(DerivedPoint { date: p.date, value });
    }

    DifferencedSeries { points }
}

/// Last calendar day of the given month.
fn month_end(year: i32, month: u32) -> NaiveDate {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    // Both branches are constructed from a valid (year, month) pair, so the
    // fallback is unreachable for dates chrono can represent.
    first_of_next
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn daily(values: &[f64]) -> PriceSeries {
        let start = d(2020, 1, 1);
        PriceSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| PricePoint {
                    date: start + chrono::Duration::days(i as i64),
                    value: v,
                })
                .collect(),
        )
    }

    #[test]
    fn month_end_handles_year_boundary_and_leap_february() {
        assert_eq!(month_end(2020, 1), d(2020, 1, 31));
        assert_eq!(month_end(2020, 2), d(2020, 2, 29));
        assert_eq!(month_end(2021, 2), d(2021, 2, 28));
        assert_eq!(month_end(2020, 12), d(2020, 12, 31));
    }

    #[test]
    fn monthly_mean_labels_month_ends() {
        let series = PriceSeries::new(vec![
            PricePoint { date: d(2020, 1, 1), value: 10.0 },
            PricePoint { date: d(2020, 1, 2), value: 20.0 },
            PricePoint { date: d(2020, 2, 1), value: 30.0 },
        ]);

        let monthly = resample_monthly_mean(&series);
        assert_eq!(
            monthly.points,
            vec![
                PricePoint { date: d(2020, 1, 31), value: 15.0 },
                PricePoint { date: d(2020, 2, 29), value: 30.0 },
            ]
        );
    }

    #[test]
    fn monthly_mean_skips_empty_months() {
        // January and March have data; February does not and must be absent.
        let series = PriceSeries::new(vec![
            PricePoint { date: d(2020, 1, 15), value: 1.0 },
            PricePoint { date: d(2020, 3, 15), value: 3.0 },
        ]);

        let monthly = resample_monthly_mean(&series);
        let dates: Vec<NaiveDate> = monthly.points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2020, 1, 31), d(2020, 3, 31)]);
    }

    #[test]
    fn monthly_mean_output_never_exceeds_distinct_months() {
        let series = daily(&[1.0; 90]); // spans Jan-Mar 2020
        let monthly = resample_monthly_mean(&series);
        assert!(monthly.points.len() <= 3);
        for p in &monthly.points {
            assert!((p.value - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn rolling_mean_window_two() {
        let series = daily(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let sma = rolling_mean(&series, 2).unwrap();

        let values: Vec<Option<f64>> = sma.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![None, Some(1.5), Some(2.5), Some(3.5), Some(4.5)]);
        // Aligned: same dates as the input.
        for (p, q) in sma.points.iter().zip(&series.points) {
            assert_eq!(p.date, q.date);
        }
    }

    #[test]
    fn rolling_mean_matches_trailing_slice_mean() {
        let series = daily(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]);
        let window = 3;
        let sma = rolling_mean(&series, window).unwrap();

        for (i, p) in sma.points.iter().enumerate() {
            if i + 1 < window {
                assert_eq!(p.value, None);
            } else {
                let expected: f64 = series.points[i + 1 - window..=i]
                    .iter()
                    .map(|q| q.value)
                    .sum::<f64>()
                    / window as f64;
                assert!((p.value.unwrap() - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn rolling_mean_window_larger_than_series_is_all_undefined() {
        let series = daily(&[1.0, 2.0, 3.0]);
        let sma = rolling_mean(&series, 10).unwrap();
        assert_eq!(sma.points.len(), 3);
        assert!(sma.points.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn rolling_mean_rejects_zero_window() {
        let series = daily(&[1.0]);
        assert!(rolling_mean(&series, 0).is_err());
    }

    #[test]
    fn diff_basic() {
        let series = daily(&[5.0, 3.0, 8.0]);
        let out = diff(&series);

        let values: Vec<Option<f64>> = out.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![None, Some(-2.0), Some(5.0)]);
    }

    #[test]
    fn empty_input_yields_empty_views() {
        let series = PriceSeries::default();

        assert!(resample_monthly_mean(&series).points.is_empty());
        assert!(rolling_mean(&series, 5).unwrap().points.is_empty());
        assert!(diff(&series).points.is_empty());
    }

    #[test]
    fn operations_are_idempotent_on_same_input() {
        let series = daily(&[2.0, 4.0, 8.0, 16.0, 32.0, 64.0]);

        assert_eq!(resample_monthly_mean(&series), resample_monthly_mean(&series));
        assert_eq!(
            rolling_mean(&series, 3).unwrap(),
            rolling_mean(&series, 3).unwrap()
        );
        assert_eq!(diff(&series), diff(&series));
    }
}
