use thiserror::Error;
use tickwindow_core::{ApiError, ConfigError, ParseError, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("parse: {0}")]
    Parse(#[from] ParseError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("symbol: {0}")]
    Symbol(#[from] ValidationError),

    #[error("api: {0}")]
    Api(#[from] ApiError),

    #[error("output: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("output: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Parse(_) | Self::Config(_) | Self::Symbol(_) => 2,
            Self::Api(_) => 1,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }

    /// Stable machine-readable code for logs.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "cli.parse",
            Self::Config(_) => "cli.config",
            Self::Symbol(_) => "cli.symbol",
            Self::Api(error) => error.code(),
            Self::Serialization(_) => "cli.serialization",
            Self::Io(_) => "cli.io",
        }
    }
}
