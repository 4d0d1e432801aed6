pub mod interval;
pub mod models;
pub mod period;
pub mod symbol;
pub mod timestamp;

pub use interval::{choose_interval, Interval, COARSEST_INTERVAL, INTERVAL_THRESHOLDS};
pub use models::{
    IntradayBar, IntradaySeries, OutputSize, SeriesMetadata, FULL_HISTORY_AFTER_SECONDS,
};
pub use period::{LookbackPeriod, PeriodUnit};
pub use symbol::Symbol;
pub use timestamp::MarketDateTime;
