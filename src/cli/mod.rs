//! Command-line parsing for the stock series viewer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the derivation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{ViewKind, DEFAULT_WINDOW};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sv", version, about = "Stock CSV dashboard: raw / monthly mean / moving average / diff")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a CSV, print the run summary, tables, and optional ASCII plots.
    Show(ViewArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying derive pipeline as `sv show`, but renders
    /// the four views as tabs in a terminal UI using Ratatui.
    Tui(ViewArgs),
    /// Plot a previously exported summary JSON.
    Plot(PlotArgs),
    /// Generate a synthetic daily price CSV for trying the viewer.
    Sample(SampleArgs),
}

/// Common options for loading a CSV and deriving views.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    /// Input CSV path. When omitted, an interactive picker lists `*.csv`
    /// files under the current directory.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Header name of the date column.
    #[arg(long, default_value = "Date")]
    pub date_column: String,

    /// Header name of the numeric column to track.
    #[arg(short = 'c', long = "column", default_value = "High")]
    pub column: String,

    /// Moving-average window (observations).
    #[arg(short = 'w', long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,

    /// Smallest selectable window.
    #[arg(long, default_value_t = 10)]
    pub window_min: usize,

    /// Largest selectable window.
    #[arg(long, default_value_t = 200)]
    pub window_max: usize,

    /// Window selector step (used by the TUI arrow keys).
    #[arg(long, default_value_t = 10)]
    pub window_step: usize,

    /// Rows shown in the raw-data preview.
    #[arg(long, default_value_t = 5)]
    pub rows: usize,

    /// Disable the terminal plots (rendered by default).
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the aligned daily table (value, moving average, diff) to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the monthly-mean table to CSV.
    #[arg(long = "export-monthly")]
    pub export_monthly: Option<PathBuf>,

    /// Export the full run summary (all views) to JSON.
    #[arg(long = "export-summary")]
    pub export_summary: Option<PathBuf>,
}

/// Options for plotting a saved summary.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Summary JSON file produced by `sv show --export-summary`.
    #[arg(long, value_name = "JSON")]
    pub summary: PathBuf,

    /// Which view to plot.
    #[arg(long, value_enum, default_value_t = ViewKind::Raw)]
    pub view: ViewKind,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for generating a sample CSV.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, default_value = "sample.csv")]
    pub out: PathBuf,

    /// Number of daily observations.
    #[arg(long, default_value_t = 500)]
    pub days: usize,

    /// Random seed (same seed, same file).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Starting price level.
    #[arg(long, default_value_t = 100.0)]
    pub start: f64,

    /// Daily log-return volatility.
    #[arg(long, default_value_t = 0.02)]
    pub vol: f64,

    /// Daily log-return drift.
    #[arg(long, default_value_t = 0.0005)]
    pub drift: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plots_are_on_by_default_and_disabled_by_no_plot() {
        let cli = Cli::try_parse_from(["sv", "show", "-f", "a.csv"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert!(!args.no_plot);

        let cli = Cli::try_parse_from(["sv", "show", "-f", "a.csv", "--no-plot"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert!(args.no_plot);

        // There is no positive flag; rendering is the default.
        assert!(Cli::try_parse_from(["sv", "show", "-f", "a.csv", "--plot"]).is_err());
    }
}
