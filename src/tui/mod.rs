//! Ratatui-based terminal UI.
//!
//! The TUI shows the four derived views as tabs (raw, monthly mean, moving
//! average, differencing) with an interactive window-size control. Every
//! window change or reload recomputes all views from scratch through the
//! same pipeline the CLI uses.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Terminal,
};

use crate::app::pipeline::RunOutput;
use crate::domain::{DerivedPoint, PricePoint, ViewConfig, ViewKind};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::SeriesChart;

/// Start the TUI.
pub fn run(config: ViewConfig) -> Result<(), AppError> {
    // Load before touching the terminal so schema/parse errors print cleanly.
    let run = crate::app::pipeline::run_views(&config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, run);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: ViewConfig,
    run: RunOutput,
    view: ViewKind,
    status: String,
}

impl App {
    fn new(config: ViewConfig, run: RunOutput) -> Self {
        let status = if run.raw().is_empty() {
            "Input contained no data rows; all views are empty.".to_string()
        } else {
            format!("Loaded {} rows.", run.ingest.rows_used)
        };
        Self {
            config,
            run,
            view: ViewKind::Raw,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Tab => {
                self.view = self.view.next();
                self.status = self.view.display_name().to_string();
            }
            KeyCode::BackTab => {
                self.view = self.view.prev();
                self.status = self.view.display_name().to_string();
            }
            KeyCode::Char(c @ '1'..='4') => {
                self.view = ViewKind::all()[(c as usize) - ('1' as usize)];
                self.status = self.view.display_name().to_string();
            }
            KeyCode::Left => self.adjust_window(-1)?,
            KeyCode::Right => self.adjust_window(1)?,
            // A reload failure (file deleted, schema changed under us) must not
            // tear down the session; keep the previous run and report it.
            KeyCode::Char('r') => match crate::app::pipeline::run_views(&self.config) {
                Ok(run) => {
                    self.run = run;
                    self.status = format!(
                        "Reloaded {} ({} rows).",
                        self.config.csv_path.display(),
                        self.run.ingest.rows_used
                    );
                }
                Err(e) => {
                    self.status = format!("Reload failed: {e}");
                }
            },
            _ => {}
        }

        Ok(false)
    }

    /// Step the moving-average window and recompute every view.
    fn adjust_window(&mut self, delta: i32) -> Result<(), AppError> {
        let bounds = self.config.window_bounds;
        let next = if delta >= 0 {
            bounds.step_up(self.config.window)
        } else {
            bounds.step_down(self.config.window)
        };
        if next == self.config.window {
            self.status = format!("Window already at bound ({next}).");
            return Ok(());
        }
        self.config.window = next;

        // Full recompute from the in-memory series; no re-read.
        let ingest = self.run.ingest.clone();
        self.run = crate::app::pipeline::run_views_with_data(&self.config, ingest)?;
        self.status = format!("window: {next}");
        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        self.draw_chart(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("sv", Style::default().fg(Color::Cyan)),
            Span::raw(" - stock series views"),
        ]));

        let dates = self
            .run
            .ingest
            .stats
            .as_ref()
            .map(|s| format!("{} → {}", s.date_min, s.date_max))
            .unwrap_or_else(|| "-".to_string());

        lines.push(Line::from(Span::styled(
            format!(
                "file: {} | column: {} | rows: {} | dates: {dates} | window: {}",
                self.config.csv_path.display(),
                self.config.value_column,
                self.run.ingest.rows_used,
                self.run.smoothed.window,
            ),
            Style::default().fg(Color::Gray),
        )));

        if !self.run.ingest.row_errors.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("skipped {} bad row(s) on ingest", self.run.ingest.row_errors.len()),
                Style::default().fg(Color::Yellow),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<Line> = ViewKind::all()
            .iter()
            .enumerate()
            .map(|(i, v)| Line::from(format!("{} {}", i + 1, v.display_name())))
            .collect();
        let selected = ViewKind::all()
            .iter()
            .position(|v| *v == self.view)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = match self.view {
            ViewKind::Average => format!("{} (window {})", self.view.display_name(), self.run.smoothed.window),
            _ => self.view.display_name().to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(data) = chart_data(&self.run, self.view) else {
            let msg = Paragraph::new("No data to display.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let widget = SeriesChart {
            primary: &data.primary,
            overlay: data.overlay.as_deref(),
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            x_label: "date",
            y_label: data.y_label,
            epoch: data.epoch,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab/1-4 view  ←/→ window  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Chart-ready series for one view.
struct ChartData {
    primary: Vec<(f64, f64)>,
    overlay: Option<Vec<(f64, f64)>>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    y_label: &'static str,
    epoch: NaiveDate,
}

/// Build chart series for Plotters. `None` when the view has nothing to draw.
fn chart_data(run: &RunOutput, view: ViewKind) -> Option<ChartData> {
    let epoch = match view {
        ViewKind::Monthly => run.monthly.points.first()?.date,
        _ => run.raw().points.first()?.date,
    };

    let (primary, overlay, y_label) = match view {
        ViewKind::Raw => (price_xy(&run.raw().points, epoch), None, "high"),
        ViewKind::Monthly => (price_xy(&run.monthly.points, epoch), None, "monthly mean"),
        ViewKind::Average => (
            price_xy(&run.raw().points, epoch),
            Some(derived_xy(&run.smoothed.points, epoch)),
            "high / sma",
        ),
        ViewKind::Diff => (
            price_xy(&run.raw().points, epoch),
            Some(derived_xy(&run.diffed.points, epoch)),
            "high / diff",
        ),
    };

    if primary.is_empty() {
        return None;
    }

    let (x_bounds, y_bounds) = bounds(&primary, overlay.as_deref())?;

    Some(ChartData {
        primary,
        overlay,
        x_bounds,
        y_bounds,
        y_label,
        epoch,
    })
}

fn price_xy(points: &[PricePoint], epoch: NaiveDate) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|p| ((p.date - epoch).num_days() as f64, p.value))
        .collect()
}

fn derived_xy(points: &[DerivedPoint], epoch: NaiveDate) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter_map(|p| p.value.map(|v| ((p.date - epoch).num_days() as f64, v)))
        .collect()
}

fn bounds(primary: &[(f64, f64)], overlay: Option<&[(f64, f64)]>) -> Option<([f64; 2], [f64; 2])> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for &(x, y) in primary.iter().chain(overlay.unwrap_or(&[])) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
        return None;
    }
    if x_max <= x_min {
        // Single observation: widen so the axis build succeeds.
        x_min -= 0.5;
        x_max += 0.5;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    Some(([x_min, x_max], [y_min - pad, y_max + pad]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_views_with_data;
    use crate::domain::{PriceSeries, SeriesStats, ViewConfig, WindowBounds};
    use crate::io::ingest::IngestedData;

    fn run_of(values: &[f64]) -> RunOutput {
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
        let ingest = IngestedData {
            series,
            stats,
            row_errors: Vec::new(),
            rows_read: rows,
            rows_used: rows,
        };
        run_views_with_data(&test_config(), ingest).unwrap()
    }

    fn test_config() -> ViewConfig {
        ViewConfig {
            csv_path: "no-such-file.csv".into(),
            date_column: "Date".to_string(),
            value_column: "High".to_string(),
            window: 2,
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
    fn average_view_filters_warmup_positions() {
        let run = run_of(&[1.0, 2.0, 3.0, 4.0]);
        let data = chart_data(&run, ViewKind::Average).unwrap();
        assert_eq!(data.primary.len(), 4);
        // window=2: the first position is undefined and must not be drawn.
        assert_eq!(data.overlay.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn diff_view_spans_negative_values() {
        let run = run_of(&[5.0, 3.0, 8.0]);
        let data = chart_data(&run, ViewKind::Diff).unwrap();
        assert!(data.y_bounds[0] < -2.0);
    }

    #[test]
    fn empty_run_yields_no_chart() {
        let run = run_of(&[]);
        for view in ViewKind::all() {
            assert!(chart_data(&run, view).is_none());
        }
    }

    #[test]
    fn failed_reload_keeps_session_and_data_alive() {
        let run = run_of(&[1.0, 2.0, 3.0]);
        // test_config points at a CSV that does not exist, so 'r' must fail.
        let mut app = App::new(test_config(), run);
        let rows_before = app.run.ingest.rows_used;

        let quit = app.handle_key(KeyCode::Char('r')).unwrap();

        assert!(!quit);
        assert!(app.status.starts_with("Reload failed:"));
        assert_eq!(app.run.ingest.rows_used, rows_before);
    }

    #[test]
    fn monthly_view_uses_month_end_epoch() {
        let run = run_of(&[1.0; 40]); // spans Jan + Feb 2020
        let data = chart_data(&run, ViewKind::Monthly).unwrap();
        assert_eq!(data.epoch, NaiveDate::from_ymd_opt(2020, 1, 31).unwrap());
        assert_eq!(data.primary.len(), 2);
    }
}
