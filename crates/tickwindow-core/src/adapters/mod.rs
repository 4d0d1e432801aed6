pub mod alphavantage;

pub use alphavantage::{parse_intraday_payload, AlphaVantageClient, IntradayRequest};
