use std::io::Write;

use serde::Serialize;
use tickwindow_core::{
    IntradayBar, IntradaySeries, Interval, LookbackWindow, MarketDateTime, WindowSummary,
    DEFAULT_TAIL_ROWS,
};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Bars of context shown when the window itself is empty.
pub const EMPTY_CONTEXT_ROWS: usize = 5;

#[derive(Debug, Serialize)]
struct SummaryDocument<'a> {
    symbol: &'a str,
    period: String,
    interval: Interval,
    time_zone: Option<&'a str>,
    window: LookbackWindow,
    rows: usize,
    fetched: usize,
    skipped: usize,
    first: Option<MarketDateTime>,
    last: Option<MarketDateTime>,
    tail: &'a [IntradayBar],
}

pub fn render(
    out: &mut impl Write,
    summary: &WindowSummary,
    series: &IntradaySeries,
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => render_table(out, summary, series),
        OutputFormat::Json => render_json(out, summary, series),
    }
}

fn render_json(
    out: &mut impl Write,
    summary: &WindowSummary,
    series: &IntradaySeries,
) -> Result<(), CliError> {
    let document = SummaryDocument {
        symbol: summary.symbol.as_str(),
        period: summary.period.to_string(),
        interval: summary.interval,
        time_zone: series.time_zone(),
        window: summary.window,
        rows: summary.rows(),
        fetched: summary.fetched,
        skipped: summary.skipped,
        first: summary.first(),
        last: summary.last(),
        tail: summary.tail(DEFAULT_TAIL_ROWS),
    };
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)?;
    Ok(())
}

fn render_table(
    out: &mut impl Write,
    summary: &WindowSummary,
    series: &IntradaySeries,
) -> Result<(), CliError> {
    write!(
        out,
        "{} | period {} | interval {}",
        summary.symbol, summary.period, summary.interval
    )?;
    match series.time_zone() {
        Some(zone) => writeln!(out, " | {zone}")?,
        None => writeln!(out)?,
    }

    if summary.skipped > 0 {
        writeln!(out, "Skipped {} malformed or duplicate entries", summary.skipped)?;
    }

    match (summary.first(), summary.last()) {
        (Some(first), Some(last)) => {
            writeln!(
                out,
                "Summary: rows={}, from={first} to={last}",
                summary.rows()
            )?;
            writeln!(out)?;
            writeln!(out, "Last {DEFAULT_TAIL_ROWS} bars:")?;
            write_bars(out, summary.tail(DEFAULT_TAIL_ROWS))?;
        }
        _ => {
            writeln!(out, "Summary: rows=0")?;
            writeln!(
                out,
                "No data in the requested window ({} to {}); the market may be closed.",
                summary.window.start, summary.window.end
            )?;
            let start = series.bars.len().saturating_sub(EMPTY_CONTEXT_ROWS);
            let context = &series.bars[start..];
            if !context.is_empty() {
                writeln!(out)?;
                writeln!(out, "Most recent bars fetched:")?;
                write_bars(out, context)?;
            }
        }
    }

    Ok(())
}

fn write_bars(out: &mut impl Write, bars: &[IntradayBar]) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<19}  {:>12}  {:>12}  {:>12}  {:>12}  {:>12}",
        "timestamp", "open", "high", "low", "close", "volume"
    )?;
    for bar in bars {
        writeln!(
            out,
            "{:<19}  {:>12.4}  {:>12.4}  {:>12.4}  {:>12.4}  {:>12}",
            bar.ts.to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        )?;
    }
    Ok(())
}
