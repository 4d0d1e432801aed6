//! CLI argument definitions for tickwindow.
//!
//! # Examples
//!
//! ```bash
//! # Last 90 minutes of AAPL, 1-minute bars
//! tickwindow AAPL 90m
//!
//! # Five days of MSFT with a chart written to msft.svg
//! tickwindow msft 5d --plot --plot-out msft.svg
//!
//! # Machine-readable output
//! tickwindow TSLA 6h --format json
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Summarize recent intraday prices for one ticker from Alpha Vantage.
#[derive(Debug, Parser)]
#[command(
    name = "tickwindow",
    author,
    version,
    about = "Summarize recent intraday prices for a ticker",
    long_about = "Fetches intraday OHLCV bars for SYMBOL from Alpha Vantage, keeps the bars \
inside the trailing PERIOD, and prints a summary with the latest rows.\n\
\n\
The sampling interval is chosen from the period: up to 2h uses 1min bars, up to 2d \
5min, up to 1w 15min, up to 2w 30min, and anything longer 60min."
)]
pub struct Cli {
    /// Ticker symbol, e.g. AAPL, MSFT, TSLA (case-insensitive).
    pub symbol: String,

    /// Lookback window: a whole number followed by m, h, d, w or y
    /// (e.g. 90m, 6h, 5d, 26w, 5y).
    #[arg(allow_hyphen_values = true)]
    pub period: String,

    /// Render the closing price over the window as an SVG chart.
    #[arg(long, default_value_t = false)]
    pub plot: bool,

    /// Chart destination (default: <SYMBOL>_<PERIOD>.svg).
    #[arg(long, value_name = "PATH", requires = "plot")]
    pub plot_out: Option<PathBuf>,

    /// Request the full available history instead of the latest 100 bars.
    ///
    /// Periods longer than 100 days always use the full history.
    #[arg(long, default_value_t = false)]
    pub full: bool,

    /// Alpha Vantage API key (default: $ALPHAVANTAGE_API_KEY).
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Output format for the summary.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Increase log detail on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary and aligned table.
    Table,
    /// Single pretty-printed JSON document.
    Json,
}
