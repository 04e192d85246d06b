//! CSV ingest and normalization.
//!
//! This module turns a daily price CSV into a clean, date-ordered
//! `PriceSeries` that is safe to derive views from.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (stable sort, no hidden state)
//! - **Separation of concerns**: no view derivation here
//!
//! Empty input is deliberately not an error: zero data rows produce an empty
//! series, and the caller decides how to present that.

use std::collections::HashMap;
use std::fs::File;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{PricePoint, PriceSeries, SeriesStats, ViewConfig};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: normalized series + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub series: PriceSeries,
    /// `None` when the input had no usable rows.
    pub stats: Option<SeriesStats>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl IngestedData {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Load and normalize the CSV named by `config` into a `PriceSeries`.
///
/// Schema failures (missing `Date`/`High` columns) and unreadable headers are
/// terminal; individual bad cells skip their row and land in `row_errors`.
pub fn load_price_series(config: &ViewConfig) -> Result<IngestedData, AppError> {
    let file = File::open(&config.csv_path).map_err(|e| {
        AppError::io(format!(
            "Failed to open CSV '{}': {e}",
            config.csv_path.display()
        ))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::parse(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);

    // A missing date column means the file cannot be interpreted as a time
    // series at all (parse failure); a missing value column is a schema
    // mismatch on an otherwise readable file.
    let date_idx = find_column(&header_map, &config.date_column)
        .ok_or_else(|| AppError::parse(format!("Missing required column: `{}`", config.date_column)))?;
    let value_idx = find_column(&header_map, &config.value_column)
        .ok_or_else(|| AppError::schema(format!("Missing required column: `{}`", config.value_column)))?;

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, date_idx, value_idx, config) {
            Ok(point) => points.push(point),
            Err(e) => row_errors.push(RowError { line, message: e }),
        }
    }

    // The derived views assume non-decreasing dates; input files are under no
    // obligation to be sorted, so we normalize here. Stable sort keeps
    // duplicate-date rows in file order.
    points.sort_by_key(|p: &PricePoint| p.date);

    let rows_used = points.len();
    let series = PriceSeries::new(points);
    let stats = SeriesStats::from_series(&series);

    Ok(IngestedData {
        series,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿Date"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, name: &str) -> Option<usize> {
    header_map.get(&normalize_header_name(name)).copied()
}

fn parse_row(
    record: &StringRecord,
    date_idx: usize,
    value_idx: usize,
    config: &ViewConfig,
) -> Result<PricePoint, String> {
    let date_cell = get_cell(record, date_idx)
        .ok_or_else(|| format!("Missing `{}` value.", config.date_column))?;
    let value_cell = get_cell(record, value_idx)
        .ok_or_else(|| format!("Missing `{}` value.", config.value_column))?;

    let date = parse_date(date_cell)?;

    let value = value_cell
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{}` value '{value_cell}'.", config.value_column))?;
    if !value.is_finite() {
        return Err(format!("Non-finite `{}` value.", config.value_column));
    }

    Ok(PricePoint { date, value })
}

fn get_cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // We recommend ISO dates (`YYYY-MM-DD`), but in practice price exports
    // often use `DD/MM/YYYY` or `DD-MM-YYYY`. We accept a small set of common
    // formats to reduce friction while keeping parsing deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}
