//! Provider configuration, read once at startup and injected into
//! [`MarketService`](crate::MarketService).

use std::fmt::{Debug, Formatter};

use thiserror::Error;

use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::ProviderId;

pub const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";
pub const ALPHAVANTAGE_BASE_URL: &str = "https://www.alphavantage.co";

pub const FINNHUB_BASE_URL_VAR: &str = "TICKERBOARD_FINNHUB_BASE_URL";
pub const ALPHAVANTAGE_BASE_URL_VAR: &str = "TICKERBOARD_ALPHAVANTAGE_BASE_URL";
pub const UPSTREAM_TIMEOUT_VAR: &str = "TICKERBOARD_UPSTREAM_TIMEOUT_MS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required secret {var} is not set")]
    MissingSecret { var: &'static str },

    #[error("{var} has invalid value '{value}': {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Provider secret. Its `Debug` output never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Blank values count as "not configured".
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: Option<ApiKey>,
    pub base_url: String,
}

impl ProviderConfig {
    pub fn new(api_key: Option<ApiKey>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

/// Everything the aggregation layer needs to reach its providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    pub finnhub: ProviderConfig,
    pub alphavantage: ProviderConfig,
    pub upstream_timeout_ms: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            finnhub: ProviderConfig::new(None, FINNHUB_BASE_URL),
            alphavantage: ProviderConfig::new(None, ALPHAVANTAGE_BASE_URL),
            upstream_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl MarketConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Missing keys are allowed here;
    /// call [`MarketConfig::require_keys`] to make them fatal.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = |provider: ProviderId| lookup(provider.api_key_var()).and_then(ApiKey::new);
        let base_url = |var: &str, default: &str| {
            lookup(var)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_owned())
        };

        let upstream_timeout_ms = match lookup(UPSTREAM_TIMEOUT_VAR) {
            None => DEFAULT_TIMEOUT_MS,
            Some(raw) => parse_timeout(&raw)?,
        };

        Ok(Self {
            finnhub: ProviderConfig::new(
                api_key(ProviderId::Finnhub),
                base_url(FINNHUB_BASE_URL_VAR, FINNHUB_BASE_URL),
            ),
            alphavantage: ProviderConfig::new(
                api_key(ProviderId::Alphavantage),
                base_url(ALPHAVANTAGE_BASE_URL_VAR, ALPHAVANTAGE_BASE_URL),
            ),
            upstream_timeout_ms,
        })
    }

    pub fn with_keys(mut self, finnhub: Option<&str>, alphavantage: Option<&str>) -> Self {
        self.finnhub.api_key = finnhub.and_then(ApiKey::new);
        self.alphavantage.api_key = alphavantage.and_then(ApiKey::new);
        self
    }

    pub fn provider(&self, provider: ProviderId) -> &ProviderConfig {
        match provider {
            ProviderId::Finnhub => &self.finnhub,
            ProviderId::Alphavantage => &self.alphavantage,
        }
    }

    pub fn is_configured(&self, provider: ProviderId) -> bool {
        self.provider(provider).api_key.is_some()
    }

    pub fn missing_keys(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|provider| !self.is_configured(*provider))
            .collect()
    }

    /// Fail fast when any provider secret is absent.
    pub fn require_keys(&self) -> Result<(), ConfigError> {
        match self.missing_keys().first() {
            Some(provider) => Err(ConfigError::MissingSecret {
                var: provider.api_key_var(),
            }),
            None => Ok(()),
        }
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        var: UPSTREAM_TIMEOUT_VAR,
        value: raw.to_owned(),
        reason: reason.to_owned(),
    };

    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| invalid(&e.to_string()))?;
    if value == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<HashMap<_, _>>();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn blank_keys_count_as_missing() {
        let config = MarketConfig::from_lookup(lookup_from(&[
            ("FINNHUB_API_KEY", "   "),
            ("ALPHA_VANTAGE_API_KEY", "av-key"),
        ]))
        .expect("config");

        assert_eq!(config.missing_keys(), vec![ProviderId::Finnhub]);
        assert_eq!(
            config.require_keys(),
            Err(ConfigError::MissingSecret {
                var: "FINNHUB_API_KEY"
            })
        );
    }

    #[test]
    fn overrides_base_urls_and_timeout() {
        let config = MarketConfig::from_lookup(lookup_from(&[
            ("TICKERBOARD_FINNHUB_BASE_URL", "http://127.0.0.1:9000/api/v1/"),
            ("TICKERBOARD_UPSTREAM_TIMEOUT_MS", "2500"),
        ]))
        .expect("config");

        assert_eq!(config.finnhub.base_url, "http://127.0.0.1:9000/api/v1");
        assert_eq!(config.alphavantage.base_url, ALPHAVANTAGE_BASE_URL);
        assert_eq!(config.upstream_timeout_ms, 2500);
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = MarketConfig::from_lookup(lookup_from(&[("TICKERBOARD_UPSTREAM_TIMEOUT_MS", "0")]))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret").expect("non-blank");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
    }
}
