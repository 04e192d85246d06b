//! Read/write run summary JSON files.
//!
//! Summary JSON is the "portable" representation of a run:
//! - the normalized raw series and every derived view
//! - run metadata (source path, column, window)
//!
//! The schema is defined by `domain::SummaryFile`; `sv plot` re-renders a
//! saved summary without touching the source CSV.

use std::fs::File;
use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::domain::{SummaryFile, ViewConfig};
use crate::error::AppError;

/// Write a summary JSON file for a completed run.
pub fn write_summary_json(path: &Path, run: &RunOutput, config: &ViewConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create summary JSON '{}': {e}", path.display())))?;

    let summary = SummaryFile {
        tool: "sv".to_string(),
        source: config.csv_path.display().to_string(),
        value_column: config.value_column.clone(),
        window: run.smoothed.window,
        stats: run.ingest.stats.clone(),
        raw: run.raw().clone(),
        monthly: run.monthly.clone(),
        smoothed: run.smoothed.clone(),
        diffed: run.diffed.clone(),
    };

    serde_json::to_writer_pretty(file, &summary)
        .map_err(|e| AppError::io(format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}

/// Read a summary JSON file.
pub fn read_summary_json(path: &Path) -> Result<SummaryFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open summary JSON '{}': {e}", path.display())))?;
    let summary: SummaryFile = serde_json::from_reader(file)
        .map_err(|e| AppError::parse(format!("Invalid summary JSON: {e}")))?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DerivedPoint, DifferencedSeries, MovingAverageSeries, PricePoint, PriceSeries,
        ResampledSeries,
    };
    use chrono::NaiveDate;

    #[test]
    fn summary_round_trips_through_serde() {
        let d = |day| NaiveDate::from_ymd_opt(2020, 1, day).unwrap();
        let summary = SummaryFile {
            tool: "sv".to_string(),
            source: "prices.csv".to_string(),
            value_column: "High".to_string(),
            window: 2,
            stats: None,
            raw: PriceSeries::new(vec![
                PricePoint { date: d(1), value: 10.0 },
                PricePoint { date: d(2), value: 20.0 },
            ]),
            monthly: ResampledSeries {
                points: vec![PricePoint { date: d(31), value: 15.0 }],
            },
            smoothed: MovingAverageSeries {
                window: 2,
                points: vec![
                    DerivedPoint { date: d(1), value: None },
                    DerivedPoint { date: d(2), value: Some(15.0) },
                ],
            },
            diffed: DifferencedSeries {
                points: vec![
                    DerivedPoint { date: d(1), value: None },
                    DerivedPoint { date: d(2), value: Some(10.0) },
                ],
            },
        };

        let json = serde_json::to_string(&summary).unwrap();
        let back: SummaryFile = serde_json::from_str(&json).unwrap();

        assert_eq!(back.window, 2);
        assert_eq!(back.raw, summary.raw);
        assert_eq!(back.smoothed.points[0].value, None);
        assert_eq!(back.diffed.points[1].value, Some(10.0));
    }
}
