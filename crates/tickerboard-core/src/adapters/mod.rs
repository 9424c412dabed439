//! Provider adapters: one upstream client per provider, plus the pure
//! functions that normalize each provider's payloads.
//!
//! Upstream shape knowledge lives here and nowhere else. Orchestration
//! (concurrency, degraded mode) is in [`crate::service`].

pub mod alphavantage;
pub mod finnhub;

pub use alphavantage::AlphaVantageAdapter;
pub use finnhub::FinnhubAdapter;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::http_client::{HttpClient, HttpRequest};
use crate::{ProviderId, SourceError, ValidationError};

/// A numeric field some providers send as a JSON number and others as text,
/// possibly with a trailing `%` (stripped before parsing).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    pub fn to_f64(&self, field: &'static str) -> Result<f64, ValidationError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => parse_percent(field, text),
        }
    }
}

/// Parse a provider percent string such as `"1.23%"` into `1.23`.
///
/// The value stays in percent units; it is not divided by 100.
pub fn parse_percent(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    parse_number(field, trimmed.strip_suffix('%').unwrap_or(trimmed))
}

/// Parse a provider numeric string, rejecting blanks and non-finite values.
pub fn parse_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber {
            field,
            value: raw.to_owned(),
        })?;
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(value)
}

/// Issue one GET and decode the JSON body, classifying every failure
/// against the symbol that was requested.
pub(crate) async fn fetch_json<T>(
    http_client: &dyn HttpClient,
    provider: ProviderId,
    symbol: &str,
    request: HttpRequest,
) -> Result<T, SourceError>
where
    T: DeserializeOwned,
{
    let url = request.redacted_url();
    debug!(%provider, symbol, %url, "requesting upstream");

    let response = http_client.execute(request).await.map_err(|error| {
        warn!(%provider, symbol, timed_out = error.timed_out(), "upstream transport error: {error}");
        SourceError::unavailable(provider, symbol, error.message())
    })?;

    if !response.is_success() {
        warn!(%provider, symbol, status = response.status, "upstream returned non-success status");
        return Err(SourceError::status(provider, symbol, response.status));
    }

    serde_json::from_str(&response.body).map_err(|error| {
        SourceError::malformed(provider, symbol, format!("unexpected payload: {error}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_suffix_is_stripped_without_rescaling() {
        assert_eq!(parse_percent("change_percent", "1.23%"), Ok(1.23));
        assert_eq!(parse_percent("change_percent", "-0.4512%"), Ok(-0.4512));
        assert_eq!(parse_percent("change_percent", " 2 "), Ok(2.0));
    }

    #[test]
    fn percent_rejects_garbage() {
        let err = parse_percent("change_percent", "n/a%").expect_err("must fail");
        assert!(matches!(err, ValidationError::NotANumber { field: "change_percent", .. }));
        assert!(parse_percent("change_percent", "%").is_err());
    }

    #[test]
    fn number_or_text_accepts_both_shapes() {
        let number: NumberOrText = serde_json::from_str("0.81").expect("number");
        let text: NumberOrText = serde_json::from_str("\"0.81%\"").expect("text");
        assert_eq!(number.to_f64("dp"), Ok(0.81));
        assert_eq!(text.to_f64("dp"), Ok(0.81));
    }
}
