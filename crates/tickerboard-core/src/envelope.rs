use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Message returned when a provider secret is not configured.
pub const CONFIG_ERROR_MESSAGE: &str = "API key not configured";

/// The three read-only aggregation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    MarketIndicators,
    News,
    Stock,
}

impl Endpoint {
    pub const fn route(self) -> &'static str {
        match self {
            Self::MarketIndicators => "/api/market-indicators",
            Self::News => "/api/news",
            Self::Stock => "/api/stock",
        }
    }

    /// How long clients may reuse a successful response.
    pub const fn freshness(self) -> Duration {
        match self {
            Self::MarketIndicators | Self::Stock => Duration::from_secs(60),
            Self::News => Duration::from_secs(300),
        }
    }

    /// Generic message for any upstream failure; the cause is only logged.
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::MarketIndicators => "Failed to fetch market indicators",
            Self::News => "Failed to fetch news",
            Self::Stock => "Failed to fetch stock data",
        }
    }

    pub fn cache_control(self) -> String {
        format!("public, max-age={}", self.freshness().as_secs())
    }
}

/// `{ "error": "..." }` body carried by every failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn configuration() -> Self {
        Self::new(CONFIG_ERROR_MESSAGE)
    }

    pub fn failure(endpoint: Endpoint) -> Self {
        Self::new(endpoint.failure_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_has_single_error_key() {
        let json = serde_json::to_value(ErrorEnvelope::failure(Endpoint::News)).expect("serializable");
        assert_eq!(json, serde_json::json!({ "error": "Failed to fetch news" }));
    }

    #[test]
    fn news_is_cached_longer_than_quotes() {
        assert_eq!(Endpoint::News.cache_control(), "public, max-age=300");
        assert_eq!(Endpoint::Stock.cache_control(), "public, max-age=60");
    }
}
