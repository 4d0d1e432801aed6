//! Close-price chart written as a standalone SVG file.

use std::io::Write;
use std::path::{Path, PathBuf};

use tickwindow_core::WindowSummary;
use tracing::{info, warn};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const PADDING: f64 = 60.0;

/// `<SYMBOL>_<period>.svg` in the working directory.
pub fn default_path(summary: &WindowSummary) -> PathBuf {
    PathBuf::from(format!("{}_{}.svg", summary.symbol, summary.period))
}

/// Write the chart when `--plot` was given.
///
/// Failures are never fatal: they are logged and a `warning:` line goes to
/// `diagnostics` whatever the log filter. Returns the path written, if any.
pub fn plot_if_requested(
    summary: &WindowSummary,
    out: Option<&Path>,
    diagnostics: &mut impl Write,
) -> Option<PathBuf> {
    if summary.is_empty() {
        info!(symbol = %summary.symbol, "no rows in window, chart skipped");
        return None;
    }

    let path = out.map_or_else(|| default_path(summary), Path::to_path_buf);
    match write_chart(&path, summary) {
        Ok(()) => {
            info!(path = %path.display(), rows = summary.rows(), "chart written");
            Some(path)
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "could not write chart");
            let _ = writeln!(
                diagnostics,
                "warning: could not write chart to {}: {error}",
                path.display()
            );
            None
        }
    }
}

pub fn write_chart(path: &Path, summary: &WindowSummary) -> std::io::Result<()> {
    std::fs::write(path, render_svg(summary))
}

/// Close price against time, oldest on the left.
pub fn render_svg(summary: &WindowSummary) -> String {
    let title = format!(
        "{} close ({}, {})",
        summary.symbol, summary.period, summary.interval
    );

    let points = summary
        .bars
        .iter()
        .map(|bar| (bar.ts.into_inner().assume_utc().unix_timestamp(), bar.close))
        .collect::<Vec<_>>();

    let min_close = points.iter().map(|(_, close)| *close).fold(f64::INFINITY, f64::min);
    let max_close = points
        .iter()
        .map(|(_, close)| *close)
        .fold(f64::NEG_INFINITY, f64::max);
    let first_secs = points.first().map_or(0, |(secs, _)| *secs);
    let last_secs = points.last().map_or(0, |(secs, _)| *secs);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let range = max_close - min_close;
    let scale_y = if range > 0.0 { plot_height / range } else { 0.0 };
    let span = (last_secs - first_secs) as f64;
    let scale_x = if span > 0.0 { plot_width / span } else { 0.0 };

    let polyline = points
        .iter()
        .map(|(secs, close)| {
            let x = PADDING + (secs - first_secs) as f64 * scale_x;
            let y = if range > 0.0 {
                HEIGHT - PADDING - (close - min_close) * scale_y
            } else {
                HEIGHT / 2.0
            };
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ");

    let first_label = summary.first().map(|ts| ts.to_string()).unwrap_or_default();
    let last_label = summary.last().map(|ts| ts.to_string()).unwrap_or_default();
    let bottom = HEIGHT - PADDING;
    let right = WIDTH - PADDING;

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="{HEIGHT:.0}" viewBox="0 0 {WIDTH:.0} {HEIGHT:.0}">
  <rect width="100%" height="100%" fill="white"/>
  <text x="{half:.0}" y="30" text-anchor="middle" font-family="sans-serif" font-size="16">{title}</text>
  <line x1="{PADDING:.0}" y1="{PADDING:.0}" x2="{PADDING:.0}" y2="{bottom:.0}" stroke="black"/>
  <line x1="{PADDING:.0}" y1="{bottom:.0}" x2="{right:.0}" y2="{bottom:.0}" stroke="black"/>
  <text x="{label_x:.0}" y="{PADDING:.0}" text-anchor="end" font-family="sans-serif" font-size="11">{max_close:.2}</text>
  <text x="{label_x:.0}" y="{bottom:.0}" text-anchor="end" font-family="sans-serif" font-size="11">{min_close:.2}</text>
  <text x="{PADDING:.0}" y="{time_y:.0}" font-family="sans-serif" font-size="11">{first_label}</text>
  <text x="{right:.0}" y="{time_y:.0}" text-anchor="end" font-family="sans-serif" font-size="11">{last_label}</text>
  <polyline fill="none" stroke="#1f77b4" stroke-width="1.5" points="{polyline}"/>
</svg>
"##,
        half = WIDTH / 2.0,
        label_x = PADDING - 6.0,
        time_y = bottom + 20.0,
    )
}
