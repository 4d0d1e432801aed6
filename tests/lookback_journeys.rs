//! End-to-end journeys from a period token to a window summary
//!
//! Each journey goes period -> interval -> fetch -> window filter against a
//! canned provider answer and a fixed clock.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};
use tickwindow_core::{
    choose_interval, AlphaVantageClient, FetchConfig, HttpClient, HttpError, HttpRequest,
    HttpResponse, IntradayRequest, Interval, LookbackPeriod, LookbackWindow, MarketDateTime,
    OutputSize, Symbol, DEFAULT_TAIL_ROWS,
};
use time::macros::datetime;
use time::PrimitiveDateTime;

struct CannedHttpClient {
    body: String,
    requests: Mutex<Vec<HttpRequest>>,
}

impl CannedHttpClient {
    fn new(body: Value) -> Self {
        Self {
            body: body.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

impl HttpClient for CannedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        let response = HttpResponse::ok_json(self.body.clone());
        Box::pin(async move { Ok(response) })
    }
}

/// `count` consecutive bars at `interval` spacing, the newest at `newest`.
fn provider_payload(interval: Interval, newest: PrimitiveDateTime, count: i64) -> Value {
    let entries = (0..count)
        .map(|back| {
            let ts = MarketDateTime::new(newest - interval.step() * back as i32);
            let price = format!("{:.4}", 150.0 + back as f64 * 0.01);
            (
                ts.to_string(),
                json!({
                    "1. open": price,
                    "2. high": price,
                    "3. low": price,
                    "4. close": price,
                    "5. volume": "1000",
                }),
            )
        })
        .collect::<Map<String, Value>>();

    let mut root = Map::new();
    root.insert(
        String::from("Meta Data"),
        json!({ "4. Interval": interval.as_str(), "6. Time Zone": "US/Eastern" }),
    );
    root.insert(interval.time_series_key(), Value::Object(entries));
    Value::Object(root)
}

fn client(http: &Arc<CannedHttpClient>) -> AlphaVantageClient {
    AlphaVantageClient::with_http_client(
        FetchConfig::new("journey-key").with_base_url("https://av.test/query"),
        http.clone(),
    )
}

#[tokio::test]
async fn ninety_minutes_of_aapl_keeps_only_the_trailing_window() {
    // Given: "90m" for AAPL and a provider answer covering the last 200 minutes
    let now = datetime!(2025-10-07 15:31:00);
    let period = LookbackPeriod::parse("90m").expect("valid period");
    let interval = choose_interval(&period);
    assert_eq!(interval, Interval::OneMinute);

    let newest = datetime!(2025-10-07 15:30:00);
    let http = Arc::new(CannedHttpClient::new(provider_payload(interval, newest, 200)));
    let request = IntradayRequest::new(Symbol::parse("aapl").expect("valid symbol"), interval);

    // When: The series is fetched and filtered at a fixed clock
    let series = client(&http)
        .fetch_intraday(&request)
        .await
        .expect("fetch should succeed");
    let summary = LookbackWindow::ending_at(MarketDateTime::new(now), &period).filter(&series, &period);

    // Then: Only bars in the last 90 minutes remain, in order
    assert_eq!(series.bars.len(), 200);
    assert_eq!(summary.rows(), 90);
    assert!(summary.rows() <= 90);
    assert_eq!(
        summary.first().map(|ts| ts.to_string()).as_deref(),
        Some("2025-10-07 14:01:00")
    );
    assert_eq!(
        summary.last().map(|ts| ts.to_string()).as_deref(),
        Some("2025-10-07 15:30:00")
    );
    assert!(summary
        .bars
        .windows(2)
        .all(|pair| pair[0].ts < pair[1].ts));
    assert_eq!(summary.tail(DEFAULT_TAIL_ROWS).len(), 10);

    // And: The request asked for 1-minute compact data
    let urls = http.urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("symbol=AAPL"));
    assert!(urls[0].contains("interval=1min"));
    assert!(urls[0].contains("outputsize=compact"));
}

#[tokio::test]
async fn five_years_uses_hourly_bars_and_full_history() {
    // Given: A "5y" lookback with compact output requested
    let period = LookbackPeriod::parse("5y").expect("valid period");

    // When: The interval and output size are decided
    let interval = choose_interval(&period);
    let output_size = OutputSize::for_lookback(OutputSize::Compact, &period);

    // Then: The coarsest interval is used and the full history is forced
    assert_eq!(interval, Interval::SixtyMinutes);
    assert_eq!(output_size, OutputSize::Full);

    // And: The fetch carries both choices
    let newest = datetime!(2025-10-07 16:00:00);
    let http = Arc::new(CannedHttpClient::new(provider_payload(interval, newest, 48)));
    let request = IntradayRequest::new(Symbol::parse("MSFT").expect("valid symbol"), interval)
        .with_output_size(output_size);
    let series = client(&http)
        .fetch_intraday(&request)
        .await
        .expect("fetch should succeed");

    let urls = http.urls();
    assert!(urls[0].contains("interval=60min"));
    assert!(urls[0].contains("outputsize=full"));

    let now = MarketDateTime::new(datetime!(2025-10-08 09:00:00));
    let summary = LookbackWindow::ending_at(now, &period).filter(&series, &period);
    assert_eq!(summary.rows(), 48);
}

#[tokio::test]
async fn a_closed_market_yields_an_empty_window_not_an_error() {
    // Given: Friday afternoon bars and a Saturday clock
    let period = LookbackPeriod::parse("1h").expect("valid period");
    let interval = choose_interval(&period);
    let http = Arc::new(CannedHttpClient::new(provider_payload(
        interval,
        datetime!(2025-10-10 16:00:00),
        30,
    )));
    let request = IntradayRequest::new(Symbol::parse("TSLA").expect("valid symbol"), interval);

    // When: The series is filtered on Saturday morning
    let series = client(&http)
        .fetch_intraday(&request)
        .await
        .expect("fetch should succeed");
    let now = MarketDateTime::new(datetime!(2025-10-11 10:00:00));
    let summary = LookbackWindow::ending_at(now, &period).filter(&series, &period);

    // Then: No rows remain, and the fetched bars are still accounted for
    assert!(summary.is_empty());
    assert_eq!(summary.rows(), 0);
    assert_eq!(summary.fetched, 30);
    assert_eq!(summary.first(), None);
    assert_eq!(summary.last(), None);
}
