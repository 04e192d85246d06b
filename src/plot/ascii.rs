//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - primary series: `-` line
//! - overlay series (moving average / difference): `*`
//!
//! The x axis is calendar time, mapped as days since the first plotted date.

use chrono::NaiveDate;

use crate::domain::{DerivedPoint, PricePoint, SummaryFile, ViewKind};

/// Render a single series as a line plot.
pub fn render_series_plot(points: &[PricePoint], width: usize, height: usize, label: &str) -> String {
    let xy = price_xy(points);
    render_plot(&xy, None, width, height, label, date_range(points))
}

/// Render a primary series with a derived overlay.
///
/// Undefined overlay positions are simply not drawn, so the rolling warm-up
/// prefix and the first diff position appear as gaps.
pub fn render_overlay_plot(
    primary: &[PricePoint],
    overlay: &[DerivedPoint],
    width: usize,
    height: usize,
    label: &str,
) -> String {
    let base = price_xy(primary);
    let over = derived_xy(overlay, primary.first().map(|p| p.date));
    render_plot(&base, Some(&over), width, height, label, date_range(primary))
}

/// Render one view of a saved summary (used by `sv plot`).
pub fn render_summary_plot(summary: &SummaryFile, kind: ViewKind, width: usize, height: usize) -> String {
    match kind {
        ViewKind::Raw => render_series_plot(&summary.raw.points, width, height, kind.display_name()),
        ViewKind::Monthly => {
            render_series_plot(&summary.monthly.points, width, height, kind.display_name())
        }
        ViewKind::Average => render_overlay_plot(
            &summary.raw.points,
            &summary.smoothed.points,
            width,
            height,
            kind.display_name(),
        ),
        ViewKind::Diff => render_overlay_plot(
            &summary.raw.points,
            &summary.diffed.points,
            width,
            height,
            kind.display_name(),
        ),
    }
}

fn render_plot(
    primary: &[(f64, f64)],
    overlay: Option<&[(f64, f64)]>,
    width: usize,
    height: usize,
    label: &str,
    dates: Option<(NaiveDate, NaiveDate)>,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((x_min, x_max)) = x_range(primary, overlay) else {
        return format!("{label}: (no data to plot)\n");
    };
    let Some((y_min, y_max)) = y_range(primary, overlay) else {
        return format!("{label}: (no data to plot)\n");
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    draw_series(&mut grid, primary, x_min, x_max, y_min, y_max, '-');
    if let Some(overlay) = overlay {
        draw_series(&mut grid, overlay, x_min, x_max, y_min, y_max, '*');
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    let date_span = dates
        .map(|(a, b)| format!("dates=[{a}, {b}]"))
        .unwrap_or_else(|| "dates=[-]".to_string());
    out.push_str(&format!("{label}: {date_span} | y=[{y_min:.2}, {y_max:.2}]\n"));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn price_xy(points: &[PricePoint]) -> Vec<(f64, f64)> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    points
        .iter()
        .map(|p| ((p.date - first.date).num_days() as f64, p.value))
        .collect()
}

fn derived_xy(points: &[DerivedPoint], epoch: Option<NaiveDate>) -> Vec<(f64, f64)> {
    let Some(epoch) = epoch.or_else(|| points.first().map(|p| p.date)) else {
        return Vec::new();
    };
    points
        .iter()
        .filter_map(|p| {
            p.value
                .map(|v| ((p.date - epoch).num_days() as f64, v))
        })
        .collect()
}

fn date_range(points: &[PricePoint]) -> Option<(NaiveDate, NaiveDate)> {
    Some((points.first()?.date, points.last()?.date))
}

fn x_range(primary: &[(f64, f64)], overlay: Option<&[(f64, f64)]>) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in primary.iter().chain(overlay.unwrap_or(&[])) {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else if min_x.is_finite() {
        // Single observation: widen artificially so mapping stays defined.
        Some((min_x - 0.5, min_x + 0.5))
    } else {
        None
    }
}

fn y_range(primary: &[(f64, f64)], overlay: Option<&[(f64, f64)]>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in primary.iter().chain(overlay.unwrap_or(&[])) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y >= min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_series(
    grid: &mut [Vec<char>],
    points: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points {
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, cx, cy, ch);
        } else if grid[cy][cx] == ' ' {
            // Same blank-cell rule as draw_line, so a later series never
            // overwrites cells an earlier one already claimed.
            grid[cy][cx] = ch;
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, day).unwrap()
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let points = vec![
            PricePoint { date: d(1), value: 10.0 },
            PricePoint { date: d(10), value: 20.0 },
        ];

        let txt = render_series_plot(&points, 10, 5, "Raw");
        let expected = concat!(
            "Raw: dates=[2020-01-01, 2020-01-10] | y=[9.50, 20.50]\n",
            "        --\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "--        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let txt = render_series_plot(&[], 20, 8, "Monthly");
        assert_eq!(txt, "Monthly: (no data to plot)\n");
    }

    #[test]
    fn overlay_gaps_are_not_drawn() {
        let primary = vec![
            PricePoint { date: d(1), value: 0.0 },
            PricePoint { date: d(2), value: 0.0 },
            PricePoint { date: d(3), value: 0.0 },
        ];
        // Only the last overlay position is defined; it must land in the
        // top-right corner, leaving the warm-up columns free of '*'.
        let overlay = vec![
            DerivedPoint { date: d(1), value: None },
            DerivedPoint { date: d(2), value: None },
            DerivedPoint { date: d(3), value: Some(1.0) },
        ];

        let txt = render_overlay_plot(&primary, &overlay, 11, 5, "Average");
        let lines: Vec<&str> = txt.lines().collect();
        assert!(lines[1].ends_with('*'));
        assert_eq!(txt.matches('*').count(), 1);
    }

    #[test]
    fn overlay_first_point_does_not_clobber_primary() {
        let primary = vec![
            PricePoint { date: d(1), value: 1.0 },
            PricePoint { date: d(2), value: 1.0 },
            PricePoint { date: d(3), value: 1.0 },
        ];
        // The overlay's only defined point coincides with a primary cell; the
        // primary line must keep that cell.
        let overlay = vec![
            DerivedPoint { date: d(1), value: Some(1.0) },
            DerivedPoint { date: d(2), value: None },
            DerivedPoint { date: d(3), value: None },
        ];

        let txt = render_overlay_plot(&primary, &overlay, 11, 5, "Average");
        assert_eq!(txt.matches('*').count(), 0);
        assert!(txt.matches('-').count() >= 11);
    }
}
