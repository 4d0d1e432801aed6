//! # tickwindow core
//!
//! Domain types and the Alpha Vantage intraday fetcher behind the
//! `tickwindow` CLI.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Alpha Vantage `TIME_SERIES_INTRADAY` client and payload validation |
//! | [`config`] | Immutable fetch configuration and API key resolution |
//! | [`domain`] | Lookback periods, intervals, symbols, timestamps, bars |
//! | [`error`] | Error taxonomy |
//! | [`http_client`] | HTTP transport seam |
//! | [`window`] | Trailing-window filter and summary |
//!
//! ## Pipeline
//!
//! ```text
//! "5d" ──▶ LookbackPeriod ──▶ choose_interval ──▶ IntradayRequest
//!                                                      │
//!                                                      ▼
//!             WindowSummary ◀── LookbackWindow ◀── AlphaVantageClient
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickwindow_core::{
//!     choose_interval, AlphaVantageClient, FetchConfig, IntradayRequest, LookbackPeriod,
//!     LookbackWindow, MarketDateTime, Symbol,
//! };
//!
//! let offset = MarketDateTime::local_offset();
//! let period = LookbackPeriod::parse("90m")?;
//! let request = IntradayRequest::new(Symbol::parse("aapl")?, choose_interval(&period));
//! let client = AlphaVantageClient::new(FetchConfig::new("demo"));
//! let series = client.fetch_intraday(&request).await?;
//! let summary = LookbackWindow::ending_at(MarketDateTime::now_at(offset), &period)
//!     .filter(&series, &period);
//! println!("rows={}", summary.rows());
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod window;

pub use adapters::{parse_intraday_payload, AlphaVantageClient, IntradayRequest};

pub use config::{FetchConfig, API_KEY_ENV_VAR, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub use domain::{
    choose_interval, IntradayBar, IntradaySeries, Interval, LookbackPeriod, MarketDateTime,
    OutputSize, PeriodUnit, SeriesMetadata, Symbol, COARSEST_INTERVAL, FULL_HISTORY_AFTER_SECONDS,
    INTERVAL_THRESHOLDS,
};

pub use error::{ApiError, ConfigError, ParseError, ValidationError};

pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use window::{LookbackWindow, WindowSummary, DEFAULT_TAIL_ROWS};
