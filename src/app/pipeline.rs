//! Shared "derive pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> {raw, monthly mean, moving average, diff}
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::domain::{DifferencedSeries, MovingAverageSeries, PriceSeries, ResampledSeries, ViewConfig};
use crate::error::AppError;
use crate::io::ingest::IngestedData;
use crate::series;

/// All computed outputs of a single run.
///
/// `ingest.series` doubles as the raw (identity) view.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub monthly: ResampledSeries,
    pub smoothed: MovingAverageSeries,
    pub diffed: DifferencedSeries,
}

impl RunOutput {
    pub fn raw(&self) -> &PriceSeries {
        &self.ingest.series
    }
}

/// Execute the full pipeline: load the CSV, then derive every view.
///
/// Ingest errors surface here, before any view is computed.
pub fn run_views(config: &ViewConfig) -> Result<RunOutput, AppError> {
    let ingest = crate::io::ingest::load_price_series(config)?;
    run_views_with_data(config, ingest)
}

/// Derive every view from already-ingested data.
///
/// This is useful for the TUI where a window change should recompute the
/// views without re-reading the file.
pub fn run_views_with_data(config: &ViewConfig, ingest: IngestedData) -> Result<RunOutput, AppError> {
    let window = config.window_bounds.clamp(config.window);

    let monthly = series::resample_monthly_mean(&ingest.series);
    let smoothed = series::rolling_mean(&ingest.series, window)?;
    let diffed = series::diff(&ingest.series);

    Ok(RunOutput {
        ingest,
        monthly,
        smoothed,
        diffed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PricePoint, SeriesStats, WindowBounds};
    use chrono::NaiveDate;

    fn ingested(values: &[f64]) -> IngestedData {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let series = PriceSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| PricePoint {
                    date: start + chrono::Duration::days(i as i64),
                    value: v,
                })
                .collect(),
        );
        let stats = SeriesStats::from_series(&series);
        let rows = series.len();
        IngestedData {
            series,
            stats,
            row_errors: Vec::new(),
            rows_read: rows,
            rows_used: rows,
        }
    }

    fn config(window: usize) -> ViewConfig {
        ViewConfig {
            csv_path: "unused.csv".into(),
            date_column: "Date".to_string(),
            value_column: "High".to_string(),
            window,
            window_bounds: WindowBounds { min: 2, max: 100, step: 1 },
            preview_rows: 5,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_results: None,
            export_monthly: None,
            export_summary: None,
        }
    }

    #[test]
    fn all_views_share_the_input_alignment() {
        let data = ingested(&[1.0, 2.0, 3.0, 4.0]);
        let run = run_views_with_data(&config(2), data).unwrap();

        assert_eq!(run.smoothed.points.len(), run.raw().len());
        assert_eq!(run.diffed.points.len(), run.raw().len());
        assert_eq!(run.monthly.points.len(), 1);
    }

    #[test]
    fn window_is_clamped_into_bounds() {
        let data = ingested(&[1.0, 2.0, 3.0]);
        let run = run_views_with_data(&config(1_000), data).unwrap();
        assert_eq!(run.smoothed.window, 100);
    }

    #[test]
    fn empty_ingest_produces_empty_views() {
        let data = ingested(&[]);
        let run = run_views_with_data(&config(5), data).unwrap();
        assert!(run.raw().is_empty());
        assert!(run.monthly.points.is_empty());
        assert!(run.smoothed.points.is_empty());
        assert!(run.diffed.points.is_empty());
    }
}
