use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::http_client::{HttpClient, HttpError, HttpRequest, ReqwestHttpClient};
use crate::{
    ApiError, FetchConfig, IntradayBar, IntradaySeries, Interval, MarketDateTime, OutputSize,
    SeriesMetadata, Symbol, ValidationError,
};

const FUNCTION: &str = "TIME_SERIES_INTRADAY";
const TIME_SERIES_PREFIX: &str = "Time Series";

/// Parameters of one intraday request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntradayRequest {
    pub symbol: Symbol,
    pub interval: Interval,
    pub output_size: OutputSize,
}

impl IntradayRequest {
    pub fn new(symbol: Symbol, interval: Interval) -> Self {
        Self {
            symbol,
            interval,
            output_size: OutputSize::Compact,
        }
    }

    pub fn with_output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = output_size;
        self
    }
}

/// Single-shot client for the Alpha Vantage `TIME_SERIES_INTRADAY` endpoint.
///
/// Every call performs exactly one HTTP exchange. Nothing is retried.
#[derive(Clone)]
pub struct AlphaVantageClient {
    config: FetchConfig,
    http_client: Arc<dyn HttpClient>,
}

impl AlphaVantageClient {
    pub fn new(config: FetchConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: FetchConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Full request URL, API key included.
    pub fn request_url(&self, req: &IntradayRequest) -> String {
        self.build_url(req, &urlencoding::encode(self.config.api_key()))
    }

    fn build_url(&self, req: &IntradayRequest, api_key: &str) -> String {
        let base = self.config.base_url();
        let separator = if base.contains('?') { '&' } else { '?' };
        format!(
            "{base}{separator}function={FUNCTION}&symbol={}&interval={}&outputsize={}&datatype=json&apikey={api_key}",
            urlencoding::encode(req.symbol.as_str()),
            req.interval.as_str(),
            req.output_size.as_str(),
        )
    }

    pub async fn fetch_intraday(&self, req: &IntradayRequest) -> Result<IntradaySeries, ApiError> {
        let timeout = self.config.timeout();
        let request = HttpRequest::get(self.request_url(req))
            .with_header("accept", "application/json")
            .with_timeout_ms(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));

        debug!(
            url = %self.build_url(req, "<redacted>"),
            timeout_ms = request.timeout_ms,
            "requesting intraday series"
        );

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| transport_error(error, timeout.as_secs()))?;

        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
            });
        }

        let series = parse_intraday_payload(&response.body, &req.symbol, req.interval)?;
        if series.skipped > 0 {
            warn!(
                symbol = %series.symbol,
                skipped = series.skipped,
                "dropped malformed or duplicate bars from provider payload"
            );
        }
        debug!(bars = series.bars.len(), "intraday series parsed");
        Ok(series)
    }
}

fn transport_error(error: HttpError, timeout_secs: u64) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout { timeout_secs }
    } else {
        ApiError::Transport {
            message: error.message().to_owned(),
        }
    }
}

/// Validate a `TIME_SERIES_INTRADAY` JSON body and convert it into a series.
///
/// Provider notices (`Note`, `Information`, `Error Message`) become errors
/// carrying the provider's text verbatim. Entries with a missing or unparsable
/// field are skipped and counted rather than failing the whole payload.
pub fn parse_intraday_payload(
    body: &str,
    symbol: &Symbol,
    interval: Interval,
) -> Result<IntradaySeries, ApiError> {
    let root: Value = serde_json::from_str(body).map_err(|error| ApiError::Schema {
        message: format!("response is not valid JSON: {error}"),
    })?;
    let Value::Object(mut root) = root else {
        return Err(ApiError::Schema {
            message: String::from("response is not a JSON object"),
        });
    };

    if let Some(note) = root.get("Note") {
        return Err(ApiError::RateLimited {
            message: notice_text(note),
        });
    }
    if let Some(information) = root.get("Information") {
        return Err(ApiError::Provider {
            message: notice_text(information),
        });
    }
    if let Some(message) = root.get("Error Message") {
        return Err(ApiError::Provider {
            message: notice_text(message),
        });
    }

    let metadata = root
        .remove("Meta Data")
        .and_then(|value| serde_json::from_value::<AlphaVantageMetaData>(value).ok())
        .map(SeriesMetadata::from);

    let key = time_series_key(&root, interval).ok_or_else(|| ApiError::Schema {
        message: format!(
            "missing '{}' (keys: {})",
            interval.time_series_key(),
            root.keys().cloned().collect::<Vec<_>>().join(", ")
        ),
    })?;
    let Some(Value::Object(entries)) = root.remove(&key) else {
        return Err(ApiError::Schema {
            message: format!("'{key}' is not an object"),
        });
    };

    let mut bars = Vec::with_capacity(entries.len());
    let mut skipped = 0_usize;
    for (raw_ts, fields) in entries {
        match normalize_bar(&raw_ts, fields) {
            Ok(bar) => bars.push(bar),
            Err(defect) => {
                debug!(ts = %raw_ts, %defect, "skipping bar");
                skipped += 1;
            }
        }
    }

    Ok(IntradaySeries::new(
        symbol.clone(),
        interval,
        metadata,
        bars,
        skipped,
    ))
}

// A drifted key is only accepted when its label still names the requested
// interval, e.g. "Time Series (5min, extended)" for 5min.
fn time_series_key(root: &Map<String, Value>, interval: Interval) -> Option<String> {
    let expected = interval.time_series_key();
    if root.contains_key(&expected) {
        return Some(expected);
    }

    let key = root
        .keys()
        .find(|key| labels_interval(key, interval))
        .cloned()?;
    warn!(%key, %expected, "using drifted time series key");
    Some(key)
}

fn labels_interval(key: &str, interval: Interval) -> bool {
    key.strip_prefix(TIME_SERIES_PREFIX)
        .map(str::trim_start)
        .and_then(|label| label.strip_prefix('('))
        .is_some_and(|label| label.trim_start().starts_with(interval.as_str()))
}

fn notice_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AlphaVantageMetaData {
    #[serde(rename = "1. Information")]
    information: Option<String>,
    #[serde(rename = "2. Symbol")]
    symbol: Option<String>,
    #[serde(rename = "3. Last Refreshed")]
    last_refreshed: Option<String>,
    #[serde(rename = "4. Interval")]
    interval: Option<String>,
    #[serde(rename = "5. Output Size")]
    output_size: Option<String>,
    #[serde(rename = "6. Time Zone")]
    time_zone: Option<String>,
}

impl From<AlphaVantageMetaData> for SeriesMetadata {
    fn from(value: AlphaVantageMetaData) -> Self {
        Self {
            information: value.information,
            symbol: value.symbol,
            last_refreshed: value.last_refreshed,
            interval: value.interval,
            output_size: value.output_size,
            time_zone: value.time_zone,
        }
    }
}

/// One entry of the time-series map before validation. Values are usually
/// strings but plain JSON numbers are tolerated.
#[derive(Debug, Clone, Default, Deserialize)]
struct AlphaVantageBarFields {
    #[serde(rename = "1. open")]
    open: Option<Value>,
    #[serde(rename = "2. high")]
    high: Option<Value>,
    #[serde(rename = "3. low")]
    low: Option<Value>,
    #[serde(rename = "4. close")]
    close: Option<Value>,
    #[serde(rename = "5. volume")]
    volume: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
enum BarDefect {
    NotAnObject,
    Missing(&'static str),
    NotANumber(&'static str),
    Timestamp,
    Invalid(ValidationError),
}

impl std::fmt::Display for BarDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => f.write_str("entry is not an object"),
            Self::Missing(field) => write!(f, "missing field '{field}'"),
            Self::NotANumber(field) => write!(f, "field '{field}' is not a number"),
            Self::Timestamp => f.write_str("unparsable timestamp"),
            Self::Invalid(error) => write!(f, "{error}"),
        }
    }
}

fn normalize_bar(raw_ts: &str, fields: Value) -> Result<IntradayBar, BarDefect> {
    if !fields.is_object() {
        return Err(BarDefect::NotAnObject);
    }
    let fields: AlphaVantageBarFields =
        serde_json::from_value(fields).map_err(|_| BarDefect::NotAnObject)?;

    let ts = MarketDateTime::parse(raw_ts).map_err(|_| BarDefect::Timestamp)?;
    let open = price_field("open", fields.open.as_ref())?;
    let high = price_field("high", fields.high.as_ref())?;
    let low = price_field("low", fields.low.as_ref())?;
    let close = price_field("close", fields.close.as_ref())?;
    let volume = volume_field(fields.volume.as_ref())?;

    IntradayBar::new(ts, open, high, low, close, volume).map_err(BarDefect::Invalid)
}

fn field_text(field: &'static str, value: Option<&Value>) -> Result<String, BarDefect> {
    match value {
        None | Some(Value::Null) => Err(BarDefect::Missing(field)),
        Some(Value::String(text)) => Ok(text.trim().to_owned()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(_) => Err(BarDefect::NotANumber(field)),
    }
}

fn price_field(field: &'static str, value: Option<&Value>) -> Result<f64, BarDefect> {
    field_text(field, value)?
        .parse::<f64>()
        .map_err(|_| BarDefect::NotANumber(field))
}

// Volumes occasionally arrive as "1234.0"; those are truncated toward zero.
fn volume_field(value: Option<&Value>) -> Result<u64, BarDefect> {
    let text = field_text("volume", value)?;
    if let Ok(volume) = text.parse::<u64>() {
        return Ok(volume);
    }
    match text.parse::<f64>() {
        Ok(volume) if volume.is_finite() && volume >= 0.0 && volume < u64::MAX as f64 => {
            Ok(volume.trunc() as u64)
        }
        _ => Err(BarDefect::NotANumber("volume")),
    }
}
