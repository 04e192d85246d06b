//! Plotters-powered series chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test/benchmark the data prep separately.
///
/// The x coordinate is days since `epoch`; tick labels are formatted back
/// into calendar dates.
pub struct SeriesChart<'a> {
    /// The view's primary line series.
    pub primary: &'a [(f64, f64)],
    /// Optional derived overlay (moving average, difference). Undefined
    /// positions are already filtered out by the caller.
    pub overlay: Option<&'a [(f64, f64)]>,
    /// X bounds (days since `epoch`).
    pub x_bounds: [f64; 2],
    /// Y bounds (price units, or price deltas for the diff view).
    pub y_bounds: [f64; 2],
    /// Axis labels (kept simple for terminal rendering).
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Date corresponding to x = 0.
    pub epoch: NaiveDate,
}

impl Widget for SeriesChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in low-resolution
            // terminal rendering; the axes + labels are usually enough here.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_date(self.epoch, *v))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Series styling: keep the palette high-contrast for terminal readability.
            let primary_color = RGBColor(0, 255, 255); // cyan
            let overlay_color = RGBColor(255, 0, 0); // red

            chart.draw_series(LineSeries::new(self.primary.iter().copied(), &primary_color))?;

            if let Some(overlay) = self.overlay {
                chart.draw_series(LineSeries::new(overlay.iter().copied(), &overlay_color))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Format an x tick (days since epoch) as a calendar date.
fn fmt_date(epoch: NaiveDate, offset: f64) -> String {
    (epoch + Duration::days(offset.round() as i64))
        .format("%Y-%m-%d")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_ticks_format_as_dates() {
        let epoch = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(fmt_date(epoch, 0.0), "2020-01-01");
        assert_eq!(fmt_date(epoch, 31.0), "2020-02-01");
        assert_eq!(fmt_date(epoch, 30.6), "2020-01-31");
    }
}
