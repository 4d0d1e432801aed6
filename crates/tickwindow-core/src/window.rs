//! Trailing-window filtering of a fetched series.
//!
//! The window is `[now - period, now]` on the provider's naive clock. Only the
//! lower bound is applied, so bars stamped slightly ahead of the local clock
//! are kept.

use serde::Serialize;
use time::PrimitiveDateTime;

use crate::{IntradayBar, IntradaySeries, Interval, LookbackPeriod, MarketDateTime, Symbol};

/// Rows shown by default in the tail of a summary.
pub const DEFAULT_TAIL_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LookbackWindow {
    pub start: MarketDateTime,
    pub end: MarketDateTime,
}

impl LookbackWindow {
    pub fn ending_at(now: MarketDateTime, period: &LookbackPeriod) -> Self {
        let start = now
            .checked_sub(period.as_duration())
            .unwrap_or(MarketDateTime::new(PrimitiveDateTime::MIN));
        Self { start, end: now }
    }

    pub fn contains(&self, ts: MarketDateTime) -> bool {
        ts >= self.start
    }

    /// Keep the bars of `series` that fall inside the window.
    pub fn filter(&self, series: &IntradaySeries, period: &LookbackPeriod) -> WindowSummary {
        let bars = series
            .bars
            .iter()
            .filter(|bar| self.contains(bar.ts))
            .copied()
            .collect::<Vec<_>>();

        WindowSummary {
            symbol: series.symbol.clone(),
            interval: series.interval,
            period: *period,
            window: *self,
            fetched: series.bars.len(),
            skipped: series.skipped,
            bars,
        }
    }
}

/// Result of applying a [`LookbackWindow`] to a series.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSummary {
    pub symbol: Symbol,
    pub interval: Interval,
    pub period: LookbackPeriod,
    pub window: LookbackWindow,
    /// Bars returned by the provider before filtering.
    pub fetched: usize,
    /// Payload entries the fetcher dropped as malformed.
    pub skipped: usize,
    /// Bars inside the window, ascending.
    pub bars: Vec<IntradayBar>,
}

impl WindowSummary {
    pub fn rows(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<MarketDateTime> {
        self.bars.first().map(|bar| bar.ts)
    }

    pub fn last(&self) -> Option<MarketDateTime> {
        self.bars.last().map(|bar| bar.ts)
    }

    /// The last `count` bars, still ascending.
    pub fn tail(&self, count: usize) -> &[IntradayBar] {
        let start = self.bars.len().saturating_sub(count);
        &self.bars[start..]
    }
}
