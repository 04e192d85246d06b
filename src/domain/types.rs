//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while deriving views
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A single dated observation of the tracked price column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A date-ordered numeric series (the normalized input).
///
/// Ingest sorts points stably by date, so consumers may assume dates are
/// non-decreasing. Duplicate dates are allowed and pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}

/// A point of a derived series aligned to the input index.
///
/// `value` is `None` where the operation is undefined (the warm-up prefix of
/// a rolling mean, the first position of a difference).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Monthly-mean view: one point per calendar month that has observations,
/// labeled with the month-end date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResampledSeries {
    pub points: Vec<PricePoint>,
}

/// Trailing simple-moving-average view, aligned to the input index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageSeries {
    pub window: usize,
    pub points: Vec<DerivedPoint>,
}

/// First-difference view, aligned to the input index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DifferencedSeries {
    pub points: Vec<DerivedPoint>,
}

/// Which derived view to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Raw values over time (identity).
    Raw,
    /// Monthly-resampled mean.
    Monthly,
    /// Raw values with the moving-average overlay.
    Average,
    /// First discrete difference.
    Diff,
}

impl ViewKind {
    /// Human-readable label for tab titles and report headings.
    pub fn display_name(self) -> &'static str {
        match self {
            ViewKind::Raw => "High Prices Over Time",
            ViewKind::Monthly => "Monthly Resampled",
            ViewKind::Average => "Moving Average",
            ViewKind::Diff => "Differencing",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ViewKind::Raw => ViewKind::Monthly,
            ViewKind::Monthly => ViewKind::Average,
            ViewKind::Average => ViewKind::Diff,
            ViewKind::Diff => ViewKind::Raw,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ViewKind::Raw => ViewKind::Diff,
            ViewKind::Monthly => ViewKind::Raw,
            ViewKind::Average => ViewKind::Monthly,
            ViewKind::Diff => ViewKind::Average,
        }
    }

    pub fn all() -> [ViewKind; 4] {
        [
            ViewKind::Raw,
            ViewKind::Monthly,
            ViewKind::Average,
            ViewKind::Diff,
        ]
    }
}

/// Bounds for the interactive window-size selector.
///
/// Different datasets want different selector ranges (10..=200 step 10 for
/// long dailies, 2..=100 step 1 for short ones), so the bounds are
/// configuration rather than an invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub min: usize,
    pub max: usize,
    pub step: usize,
}

/// Default selector bounds for long daily histories.
pub const DEFAULT_WINDOW_BOUNDS: WindowBounds = WindowBounds {
    min: 10,
    max: 200,
    step: 10,
};

/// Default moving-average window under the default bounds.
pub const DEFAULT_WINDOW: usize = 50;

impl WindowBounds {
    /// Clamp a requested window into the configured range.
    pub fn clamp(&self, window: usize) -> usize {
        window.clamp(self.min, self.max)
    }

    /// One selector step up, saturating at `max`.
    pub fn step_up(&self, window: usize) -> usize {
        self.clamp(window.saturating_add(self.step.max(1)))
    }

    /// One selector step down, saturating at `min`.
    pub fn step_down(&self, window: usize) -> usize {
        self.clamp(window.saturating_sub(self.step.max(1)))
    }

    pub fn is_valid(&self) -> bool {
        self.min >= 1 && self.max >= self.min && self.step >= 1
    }
}

/// Summary stats about the points actually used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub n_points: usize,
    pub date_min: NaiveDate,
    pub date_max: NaiveDate,
    pub value_min: f64,
    pub value_max: f64,
}

impl SeriesStats {
    /// Compute stats over a series; `None` when the series is empty or a
    /// value is non-finite.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let first = series.points.first()?;

        let mut date_min = first.date;
        let mut date_max = first.date;
        let mut value_min = f64::INFINITY;
        let mut value_max = f64::NEG_INFINITY;

        for p in &series.points {
            date_min = date_min.min(p.date);
            date_max = date_max.max(p.date);
            value_min = value_min.min(p.value);
            value_max = value_max.max(p.value);
        }

        if !value_min.is_finite() || !value_max.is_finite() {
            return None;
        }

        Some(Self {
            n_points: series.len(),
            date_min,
            date_max,
            value_min,
            value_max,
        })
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub csv_path: PathBuf,
    /// Header name of the date column (`Date` by default).
    pub date_column: String,
    /// Header name of the numeric column of interest (`High` by default).
    pub value_column: String,

    pub window: usize,
    pub window_bounds: WindowBounds,

    /// Rows shown in the raw-data preview.
    pub preview_rows: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_monthly: Option<PathBuf>,
    pub export_summary: Option<PathBuf>,
}

/// A saved run summary (JSON).
///
/// This is the "portable" representation of a run: enough to re-plot the
/// views without the source CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryFile {
    pub tool: String,
    pub source: String,
    pub value_column: String,
    pub window: usize,
    pub stats: Option<SeriesStats>,
    pub raw: PriceSeries,
    pub monthly: ResampledSeries,
    pub smoothed: MovingAverageSeries,
    pub diffed: DifferencedSeries,
}
