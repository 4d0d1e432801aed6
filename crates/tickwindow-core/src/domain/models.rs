use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{Interval, LookbackPeriod, MarketDateTime, Symbol, ValidationError};

/// Lookbacks longer than this always request the full history; a compact
/// response cannot reach that far back.
pub const FULL_HISTORY_AFTER_SECONDS: i64 = 100 * 86_400;

/// Provider result size: the latest 100 bars or the whole available history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputSize {
    #[default]
    Compact,
    Full,
}

impl OutputSize {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }

    /// Upgrade `requested` to [`OutputSize::Full`] for lookbacks beyond
    /// [`FULL_HISTORY_AFTER_SECONDS`].
    pub fn for_lookback(requested: Self, period: &LookbackPeriod) -> Self {
        if period.total_seconds() > FULL_HISTORY_AFTER_SECONDS {
            Self::Full
        } else {
            requested
        }
    }
}

impl Display for OutputSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntradayBar {
    pub ts: MarketDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl IntradayBar {
    pub fn new(
        ts: MarketDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_price("open", open)?;
        validate_price("high", high)?;
        validate_price("low", low)?;
        validate_price("close", close)?;

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// The provider's "Meta Data" block. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesMetadata {
    pub information: Option<String>,
    pub symbol: Option<String>,
    pub last_refreshed: Option<String>,
    pub interval: Option<String>,
    pub output_size: Option<String>,
    pub time_zone: Option<String>,
}

/// Bars for one symbol and interval, ascending and unique by timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct IntradaySeries {
    pub symbol: Symbol,
    pub interval: Interval,
    pub metadata: Option<SeriesMetadata>,
    pub bars: Vec<IntradayBar>,
    /// Payload entries dropped because a field was missing or unparsable, or
    /// because their timestamp repeated one already kept.
    pub skipped: usize,
}

impl IntradaySeries {
    /// Build a series, sorting bars ascending by timestamp.
    ///
    /// Bars whose timestamp equals an earlier bar's are dropped (the first in
    /// input order wins) and added to `skipped`.
    pub fn new(
        symbol: Symbol,
        interval: Interval,
        metadata: Option<SeriesMetadata>,
        mut bars: Vec<IntradayBar>,
        skipped: usize,
    ) -> Self {
        bars.sort_by_key(|bar| bar.ts);
        let before = bars.len();
        bars.dedup_by_key(|bar| bar.ts);
        let duplicates = before - bars.len();

        Self {
            symbol,
            interval,
            metadata,
            bars,
            skipped: skipped + duplicates,
        }
    }

    pub fn time_zone(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.time_zone.as_deref())
    }
}

fn validate_price(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> MarketDateTime {
        MarketDateTime::parse(value).expect("timestamp")
    }

    #[test]
    fn rejects_negative_and_non_finite_prices() {
        let err = IntradayBar::new(ts("2025-01-02 10:00:00"), -1.0, 2.0, 1.0, 1.5, 10)
            .expect_err("must fail");
        assert_eq!(err, ValidationError::NegativeValue { field: "open" });

        let err = IntradayBar::new(ts("2025-01-02 10:00:00"), 1.0, f64::NAN, 1.0, 1.5, 10)
            .expect_err("must fail");
        assert_eq!(err, ValidationError::NonFiniteValue { field: "high" });
    }

    #[test]
    fn long_lookbacks_force_full_history() {
        let short = LookbackPeriod::parse("100d").expect("valid period");
        let long = LookbackPeriod::parse("101d").expect("valid period");

        assert_eq!(OutputSize::for_lookback(OutputSize::Compact, &short), OutputSize::Compact);
        assert_eq!(OutputSize::for_lookback(OutputSize::Full, &short), OutputSize::Full);
        assert_eq!(OutputSize::for_lookback(OutputSize::Compact, &long), OutputSize::Full);
    }

    #[test]
    fn series_sorts_bars_ascending() {
        let late = IntradayBar::new(ts("2025-01-02 10:05:00"), 1.0, 1.0, 1.0, 1.0, 1)
            .expect("valid bar");
        let early = IntradayBar::new(ts("2025-01-02 10:00:00"), 2.0, 2.0, 2.0, 2.0, 2)
            .expect("valid bar");
        let series = IntradaySeries::new(
            Symbol::parse("AAPL").expect("valid symbol"),
            Interval::FiveMinutes,
            None,
            vec![late, early],
            0,
        );

        assert_eq!(series.bars, vec![early, late]);
        assert_eq!(series.time_zone(), None);
    }

    #[test]
    fn colliding_timestamps_keep_the_first_bar() {
        let minute_form = IntradayBar::new(ts("2025-10-07 09:30"), 1.0, 1.0, 1.0, 1.0, 1)
            .expect("valid bar");
        let second_form = IntradayBar::new(ts("2025-10-07 09:30:00"), 2.0, 2.0, 2.0, 2.0, 2)
            .expect("valid bar");
        let other = IntradayBar::new(ts("2025-10-07T13:30:00Z"), 3.0, 3.0, 3.0, 3.0, 3)
            .expect("valid bar");

        let series = IntradaySeries::new(
            Symbol::parse("AAPL").expect("valid symbol"),
            Interval::OneMinute,
            None,
            vec![minute_form, second_form, other],
            1,
        );

        assert_eq!(series.bars, vec![minute_form, other]);
        assert_eq!(series.skipped, 2);
    }
}
