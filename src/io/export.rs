//! Export derived views to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts: one aligned daily table, and one compact monthly table.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::domain::ResampledSeries;
use crate::error::AppError;

/// Write the aligned daily table: raw value, moving average, difference.
///
/// Undefined positions (the rolling warm-up, the first diff row) export as
/// empty cells, not zeros.
pub fn write_results_csv(path: &Path, run: &RunOutput, value_column: &str) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(
        file,
        "date,{},sma_{},diff",
        value_column.to_ascii_lowercase(),
        run.smoothed.window
    )
    .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for (i, p) in run.raw().points.iter().enumerate() {
        let sma = run.smoothed.points.get(i).and_then(|q| q.value);
        let dv = run.diffed.points.get(i).and_then(|q| q.value);
        writeln!(
            file,
            "{},{:.6},{},{}",
            p.date,
            p.value,
            fmt_opt(sma),
            fmt_opt(dv),
        )
        .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the monthly-mean table.
pub fn write_monthly_csv(path: &Path, monthly: &ResampledSeries, value_column: &str) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create monthly CSV '{}': {e}", path.display())))?;

    writeln!(file, "month_end,mean_{}", value_column.to_ascii_lowercase())
        .map_err(|e| AppError::io(format!("Failed to write monthly CSV header: {e}")))?;

    for p in &monthly.points {
        writeln!(file, "{},{:.6}", p.date, p.value)
            .map_err(|e| AppError::io(format!("Failed to write monthly CSV row: {e}")))?;
    }

    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.6}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_cells_export_empty() {
        assert_eq!(fmt_opt(None), "");
        assert_eq!(fmt_opt(Some(1.5)), "1.500000");
    }
}
