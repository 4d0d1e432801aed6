use std::fmt::{Display, Formatter};

use serde::Serialize;
use time::Duration;

use crate::LookbackPeriod;

const HOUR: i64 = 3_600;
const DAY: i64 = 24 * HOUR;

/// Sampling granularities offered by the Alpha Vantage intraday endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Interval {
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "60min")]
    SixtyMinutes,
}

/// Upper bound (inclusive, in seconds) of each lookback tier, finest first.
///
/// The first bound at or above the lookback wins. Anything longer than the
/// last bound uses [`COARSEST_INTERVAL`].
pub const INTERVAL_THRESHOLDS: [(i64, Interval); 4] = [
    (2 * HOUR, Interval::OneMinute),
    (2 * DAY, Interval::FiveMinutes),
    (7 * DAY, Interval::FifteenMinutes),
    (14 * DAY, Interval::ThirtyMinutes),
];

pub const COARSEST_INTERVAL: Interval = Interval::SixtyMinutes;

/// Pick the sampling interval for a lookback period. Never fails.
pub fn choose_interval(period: &LookbackPeriod) -> Interval {
    let seconds = period.total_seconds();
    INTERVAL_THRESHOLDS
        .iter()
        .find(|(upper_bound, _)| seconds <= *upper_bound)
        .map_or(COARSEST_INTERVAL, |(_, interval)| *interval)
}

impl Interval {
    pub const ALL: [Self; 5] = [
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::SixtyMinutes,
    ];

    /// Value of the `interval` query parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1min",
            Self::FiveMinutes => "5min",
            Self::FifteenMinutes => "15min",
            Self::ThirtyMinutes => "30min",
            Self::SixtyMinutes => "60min",
        }
    }

    pub const fn step(self) -> Duration {
        match self {
            Self::OneMinute => Duration::minutes(1),
            Self::FiveMinutes => Duration::minutes(5),
            Self::FifteenMinutes => Duration::minutes(15),
            Self::ThirtyMinutes => Duration::minutes(30),
            Self::SixtyMinutes => Duration::minutes(60),
        }
    }

    /// Name of the payload key holding the bars, e.g. `Time Series (5min)`.
    pub fn time_series_key(self) -> String {
        format!("Time Series ({})", self.as_str())
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
