//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the input CSV (flag or interactive picker)
//! - runs the derive pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, PlotArgs, SampleArgs, ViewArgs};
use crate::domain::{ViewConfig, ViewKind, WindowBounds};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `sv` binary.
pub fn run() -> Result<(), AppError> {
    // We want `sv` and `sv -f prices.csv` to behave like `sv tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Show(args) => handle_show(args),
        Command::Tui(args) => handle_tui(args),
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_show(args: ViewArgs) -> Result<(), AppError> {
    let config = view_config_from_args(args)?;
    let run = pipeline::run_views(&config)?;

    print!("{}", crate::report::format_run_summary(&run, &config));
    println!();
    print!("{}", crate::report::format_preview(&run.ingest, config.preview_rows));
    println!();
    print!("{}", crate::report::format_monthly_table(&run));

    if config.plot && !run.raw().is_empty() {
        let w = config.plot_width;
        let h = config.plot_height;
        println!();
        print!("{}", crate::plot::render_series_plot(&run.raw().points, w, h, ViewKind::Raw.display_name()));
        println!();
        print!("{}", crate::plot::render_series_plot(&run.monthly.points, w, h, ViewKind::Monthly.display_name()));
        println!();
        print!(
            "{}",
            crate::plot::render_overlay_plot(
                &run.raw().points,
                &run.smoothed.points,
                w,
                h,
                ViewKind::Average.display_name(),
            )
        );
        println!();
        print!(
            "{}",
            crate::plot::render_overlay_plot(
                &run.raw().points,
                &run.diffed.points,
                w,
                h,
                ViewKind::Diff.display_name(),
            )
        );
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run, &config.value_column)?;
    }
    if let Some(path) = &config.export_monthly {
        crate::io::export::write_monthly_csv(path, &run.monthly, &config.value_column)?;
    }
    if let Some(path) = &config.export_summary {
        crate::io::summary::write_summary_json(path, &run, &config)?;
    }

    Ok(())
}

fn handle_tui(args: ViewArgs) -> Result<(), AppError> {
    let config = view_config_from_args(args)?;
    crate::tui::run(config)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let summary = crate::io::summary::read_summary_json(&args.summary)?;
    let plot = crate::plot::render_summary_plot(&summary, args.view, args.width, args.height);
    print!("{plot}");
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let params = crate::data::SampleParams {
        days: args.days,
        seed: args.seed,
        start_price: args.start,
        daily_vol: args.vol,
        drift: args.drift,
    };
    let series = crate::data::generate_price_series(&params)?;
    crate::data::write_sample_csv(&args.out, &series)?;
    println!("Wrote {} rows to {}", series.len(), args.out.display());
    Ok(())
}

/// Build a `ViewConfig` from CLI flags, resolving the CSV path via the
/// interactive picker when `-f` was not given.
pub fn view_config_from_args(args: ViewArgs) -> Result<ViewConfig, AppError> {
    let window_bounds = WindowBounds {
        min: args.window_min,
        max: args.window_max,
        step: args.window_step,
    };
    if !window_bounds.is_valid() {
        return Err(AppError::usage(format!(
            "Invalid window bounds: min={} max={} step={} (need min >= 1, max >= min, step >= 1).",
            window_bounds.min, window_bounds.max, window_bounds.step
        )));
    }

    let csv_path = match args.file {
        Some(path) => crate::cli::picker::validate_csv_path(&path)?,
        None => crate::cli::picker::prompt_for_csv_path()?,
    };

    Ok(ViewConfig {
        csv_path,
        date_column: args.date_column,
        value_column: args.column,
        window: window_bounds.clamp(args.window),
        window_bounds,
        preview_rows: args.rows,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export,
        export_monthly: args.export_monthly,
        export_summary: args.export_summary,
    })
}

/// Rewrite argv so `sv` defaults to `sv tui`.
///
/// Rules:
/// - `sv`                      -> `sv tui`
/// - `sv -f prices.csv ...`    -> `sv tui -f prices.csv ...`
/// - `sv --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "tui" | "plot" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["sv"])), argv(&["sv", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["sv", "-f", "a.csv"])),
            argv(&["sv", "tui", "-f", "a.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(rewrite_args(argv(&["sv", "show"])), argv(&["sv", "show"]));
        assert_eq!(rewrite_args(argv(&["sv", "--help"])), argv(&["sv", "--help"]));
        assert_eq!(rewrite_args(argv(&["sv", "sample"])), argv(&["sv", "sample"]));
    }
}
