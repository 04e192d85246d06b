//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the derivation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::ViewConfig;
use crate::io::ingest::IngestedData;

/// How many row-level errors to print before truncating.
const MAX_REPORTED_ROW_ERRORS: usize = 5;

/// Format the full run summary (source, rows, ranges, window).
pub fn format_run_summary(run: &RunOutput, config: &ViewConfig) -> String {
    let ingest = &run.ingest;
    let mut out = String::new();

    out.push_str("=== sv - Stock Series Views ===\n");
    out.push_str(&format!("Source: {}\n", config.csv_path.display()));
    out.push_str(&format!("Column: {}\n", config.value_column));
    out.push_str(&format!(
        "Rows: read={} used={} skipped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));

    match &ingest.stats {
        Some(stats) => {
            out.push_str(&format!(
                "Dates: [{}, {}] | values: [{:.2}, {:.2}]\n",
                stats.date_min, stats.date_max, stats.value_min, stats.value_max
            ));
        }
        None => {
            out.push_str("Warning: input contained no data rows; all views are empty.\n");
        }
    }

    out.push_str(&format!(
        "Window: {} (bounds {}..={} step {})\n",
        run.smoothed.window,
        config.window_bounds.min,
        config.window_bounds.max,
        config.window_bounds.step
    ));
    out.push_str(&format!("Monthly buckets: {}\n", run.monthly.points.len()));

    if !ingest.row_errors.is_empty() {
        out.push_str("\nSkipped rows:\n");
        for err in ingest.row_errors.iter().take(MAX_REPORTED_ROW_ERRORS) {
            out.push_str(&format!("  line {}: {}\n", err.line, err.message));
        }
        let hidden = ingest.row_errors.len().saturating_sub(MAX_REPORTED_ROW_ERRORS);
        if hidden > 0 {
            out.push_str(&format!("  ... and {hidden} more\n"));
        }
    }

    out
}

/// Format the raw-data preview (first `rows` observations).
pub fn format_preview(ingest: &IngestedData, rows: usize) -> String {
    let mut out = String::new();

    out.push_str("Raw data preview:\n");
    if ingest.series.is_empty() {
        out.push_str("  (no rows)\n");
        return out;
    }

    out.push_str(&format!("{:<12} {:>12}\n", "date", "value"));
    for p in ingest.series.points.iter().take(rows.max(1)) {
        out.push_str(&format!("{:<12} {:>12.4}\n", p.date.to_string(), p.value));
    }
    if ingest.series.len() > rows {
        out.push_str(&format!("  ... {} rows total\n", ingest.series.len()));
    }

    out
}

/// Format the monthly-mean table.
pub fn format_monthly_table(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("Monthly resampled mean:\n");
    if run.monthly.points.is_empty() {
        out.push_str("  (no months)\n");
        return out;
    }

    out.push_str(&format!("{:<12} {:>12}\n", "month_end", "mean"));
    for p in &run.monthly.points {
        out.push_str(&format!("{:<12} {:>12.4}\n", p.date.to_string(), p.value));
    }

    out
}
