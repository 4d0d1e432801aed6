use thiserror::Error;

/// Input validation errors for domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol '{value}' has a '.' or '-' that does not join two parts")]
    SymbolMisplacedSeparator { value: String },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid market timestamp '{value}'")]
    InvalidTimestamp { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
}

/// Lookback period grammar errors (`<positive integer><m|h|d|w|y>`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("period cannot be empty")]
    Empty,
    #[error("period '{value}' is missing a unit letter (m, h, d, w, y)")]
    MissingUnit { value: String },
    #[error("period '{value}' has unsupported unit '{unit}', expected one of m, h, d, w, y")]
    UnknownUnit { value: String, unit: char },
    #[error("period '{value}' must start with a positive whole number")]
    InvalidMagnitude { value: String },
    #[error("period '{value}' must be greater than zero")]
    Zero { value: String },
    #[error("period '{value}' is too large")]
    Overflow { value: String },
}

/// Configuration errors raised while assembling the fetch configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no Alpha Vantage API key; pass --api-key or set {env_var}")]
    MissingApiKey { env_var: &'static str },
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Failures talking to, or interpreting the answer of, the remote provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("rate limit: {message}")]
    RateLimited { message: String },
    #[error("provider: {message}")]
    Provider { message: String },
    #[error("unexpected response: {message}")]
    Schema { message: String },
    #[error("upstream returned status {status}")]
    Status { status: u16 },
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
    #[error("transport: {message}")]
    Transport { message: String },
}

impl ApiError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "api.rate_limited",
            Self::Provider { .. } => "api.provider",
            Self::Schema { .. } => "api.schema",
            Self::Status { .. } => "api.status",
            Self::Timeout { .. } => "api.timeout",
            Self::Transport { .. } => "api.transport",
        }
    }
}
