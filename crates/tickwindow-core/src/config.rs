use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::ConfigError;

/// Environment variable consulted when no `--api-key` flag is given.
pub const API_KEY_ENV_VAR: &str = "ALPHAVANTAGE_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable settings handed to the fetcher by the caller.
///
/// The fetcher never reads the process environment itself.
#[derive(Clone, PartialEq, Eq)]
pub struct FetchConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl FetchConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Resolve the API key from the flag first, then the environment value.
    ///
    /// Blank values count as absent.
    pub fn resolve(flag: Option<String>, env: Option<String>) -> Result<Self, ConfigError> {
        flag.into_iter()
            .chain(env)
            .map(|value| value.trim().to_owned())
            .find(|value| !value.is_empty())
            .map(Self::new)
            .ok_or(ConfigError::MissingApiKey {
                env_var: API_KEY_ENV_VAR,
            })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Debug for FetchConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        let config = FetchConfig::resolve(Some("flag-key".into()), Some("env-key".into()))
            .expect("key resolves");
        assert_eq!(config.api_key(), "flag-key");
    }

    #[test]
    fn falls_back_to_environment() {
        let config =
            FetchConfig::resolve(None, Some(" env-key ".into())).expect("key resolves");
        assert_eq!(config.api_key(), "env-key");

        let config = FetchConfig::resolve(Some("  ".into()), Some("env-key".into()))
            .expect("key resolves");
        assert_eq!(config.api_key(), "env-key");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = FetchConfig::resolve(None, Some(String::new())).expect_err("must fail");
        assert_eq!(
            err,
            ConfigError::MissingApiKey {
                env_var: API_KEY_ENV_VAR
            }
        );
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = FetchConfig::new("secret-key");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = FetchConfig::new("k")
            .with_timeout(Duration::ZERO)
            .expect_err("must fail");
        assert_eq!(err, ConfigError::ZeroTimeout);
        assert_eq!(FetchConfig::new("k").timeout(), DEFAULT_TIMEOUT);
    }
}
