use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{fetch_json, parse_number, parse_percent};
use crate::config::ApiKey;
use crate::http_client::{HttpClient, HttpRequest};
use crate::{Indicator, IndicatorType, ProviderId, SourceError, UtcDateTime, ValidationError};

pub const GLOBAL_QUOTE_MAX_AGE: Duration = Duration::from_secs(60);

/// Alpha Vantage adapter, used for the index proxies behind the indicators panel.
#[derive(Clone)]
pub struct AlphaVantageAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: ApiKey,
    base_url: String,
    timeout_ms: u64,
}

impl AlphaVantageAdapter {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        api_key: ApiKey,
        base_url: impl Into<String>,
        timeout_ms: u64,
    ) -> Self {
        Self {
            http_client,
            api_key,
            base_url: base_url.into(),
            timeout_ms,
        }
    }

    /// `GLOBAL_QUOTE` for one symbol. Throttling notices and unknown symbols
    /// both arrive as `200` without a `Global Quote` object.
    pub async fn global_quote(&self, symbol: &str) -> Result<AlphaVantageQuoteResponse, SourceError> {
        let endpoint = format!(
            "{}/query?function=GLOBAL_QUOTE&symbol={}&apikey={}",
            self.base_url,
            urlencoding::encode(symbol),
            urlencoding::encode(self.api_key.expose())
        );
        let request = HttpRequest::get(endpoint)
            .with_timeout_ms(self.timeout_ms)
            .with_max_age(GLOBAL_QUOTE_MAX_AGE);

        fetch_json(
            self.http_client.as_ref(),
            ProviderId::Alphavantage,
            symbol,
            request,
        )
        .await
    }

    /// Fetch the proxy quote for `indicator_type` and normalize it.
    pub async fn indicator(
        &self,
        indicator_type: IndicatorType,
        recorded_at: UtcDateTime,
    ) -> Result<Indicator, SourceError> {
        let symbol = indicator_type.proxy_symbol();
        let response = self.global_quote(symbol).await?;
        normalize_indicator(indicator_type, &response, recorded_at).map_err(|error| {
            let message = match response.notice() {
                Some(notice) => format!("{error}; provider notice: {notice}"),
                None => error.to_string(),
            };
            SourceError::malformed(ProviderId::Alphavantage, symbol, message)
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlphaVantageQuoteResponse {
    #[serde(rename = "Global Quote", default)]
    pub quote: Option<AlphaVantageGlobalQuote>,
    /// Free-tier throttling notice.
    #[serde(rename = "Note", default)]
    pub note: Option<String>,
    #[serde(rename = "Information", default)]
    pub information: Option<String>,
}

impl AlphaVantageQuoteResponse {
    /// Throttling or usage notice sent in place of a quote.
    pub fn notice(&self) -> Option<&str> {
        self.note
            .as_deref()
            .or(self.information.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlphaVantageGlobalQuote {
    #[serde(rename = "05. price", default)]
    pub price: Option<String>,
    #[serde(rename = "09. change", default)]
    pub change: Option<String>,
    #[serde(rename = "10. change percent", default)]
    pub change_percent: Option<String>,
}

/// Map a `GLOBAL_QUOTE` body onto an [`Indicator`] stamped with `recorded_at`.
///
/// | Field                | Indicator        |
/// |----------------------|------------------|
/// | `05. price`          | `value`          |
/// | `09. change`         | `change_value`   |
/// | `10. change percent` | `change_percent` |
///
/// A body without a `Global Quote` object or without a price is a shape error.
pub fn normalize_indicator(
    indicator_type: IndicatorType,
    response: &AlphaVantageQuoteResponse,
    recorded_at: UtcDateTime,
) -> Result<Indicator, ValidationError> {
    let quote = response
        .quote
        .as_ref()
        .ok_or(ValidationError::MissingField {
            field: "Global Quote",
        })?;
    let price = quote
        .price
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .ok_or(ValidationError::MissingField { field: "05. price" })?;

    let change = quote
        .change
        .as_deref()
        .ok_or(ValidationError::MissingField { field: "09. change" })?;
    let change_percent = quote
        .change_percent
        .as_deref()
        .ok_or(ValidationError::MissingField {
            field: "10. change percent",
        })?;

    Indicator::new(
        indicator_type,
        parse_number("05. price", price)?,
        parse_number("09. change", change)?,
        parse_percent("10. change percent", change_percent)?,
        recorded_at,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpResponse, ScriptedHttpClient};
    use crate::SourceErrorKind;

    const SPY_BODY: &str = r#"{
        "Global Quote": {
            "01. symbol": "SPY",
            "05. price": "512.3400",
            "09. change": "-2.1000",
            "10. change percent": "-0.4082%"
        }
    }"#;

    fn decode(body: &str) -> AlphaVantageQuoteResponse {
        serde_json::from_str(body).expect("decodes")
    }

    fn at() -> UtcDateTime {
        UtcDateTime::parse("2024-03-08T14:30:00Z").expect("valid")
    }

    #[test]
    fn maps_numbered_fields_onto_indicator() {
        let indicator =
            normalize_indicator(IndicatorType::BroadMarket, &decode(SPY_BODY), at()).expect("valid");

        assert_eq!(indicator.indicator_type, IndicatorType::BroadMarket);
        assert_eq!(indicator.value, 512.34);
        assert_eq!(indicator.change_value, -2.1);
        assert_eq!(indicator.change_percent, -0.4082);
        assert_eq!(indicator.recorded_at, at());
    }

    #[test]
    fn throttling_notice_is_a_shape_error() {
        let response = decode(r#"{"Note":"Thank you for using Alpha Vantage!"}"#);
        assert_eq!(response.notice(), Some("Thank you for using Alpha Vantage!"));

        let err = normalize_indicator(IndicatorType::Tech, &response, at()).expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "Global Quote"
            }
        );
    }

    #[test]
    fn empty_global_quote_is_missing_price() {
        let err = normalize_indicator(IndicatorType::Volatility, &decode(r#"{"Global Quote":{}}"#), at())
            .expect_err("must fail");
        assert_eq!(err, ValidationError::MissingField { field: "05. price" });
    }

    #[tokio::test]
    async fn requests_proxy_symbol_with_one_minute_hint() {
        let client = Arc::new(
            ScriptedHttpClient::new().respond("symbol=DIA", HttpResponse::ok_json(SPY_BODY)),
        );
        let adapter = AlphaVantageAdapter::new(
            Arc::clone(&client) as Arc<dyn HttpClient>,
            ApiKey::new("av-key").expect("non-blank"),
            "https://av.test",
            2_000,
        );

        adapter
            .indicator(IndicatorType::Industrial, at())
            .await
            .expect("scripted body is valid");

        let request = &client.requests()[0];
        assert_eq!(
            request.url,
            "https://av.test/query?function=GLOBAL_QUOTE&symbol=DIA&apikey=av-key"
        );
        assert_eq!(request.max_age, Some(GLOBAL_QUOTE_MAX_AGE));
    }

    #[tokio::test]
    async fn rate_limit_notice_is_carried_into_the_error() {
        let client = Arc::new(ScriptedHttpClient::new().respond(
            "symbol=QQQ",
            HttpResponse::ok_json(r#"{"Information":"Our standard API rate limit is 25 requests per day."}"#),
        ));
        let adapter = AlphaVantageAdapter::new(
            client,
            ApiKey::new("av-key").expect("non-blank"),
            "https://av.test",
            2_000,
        );

        let err = adapter
            .indicator(IndicatorType::Tech, at())
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::Malformed);
        assert!(err.message().contains("rate limit is 25 requests"), "{}", err.message());
    }

    #[tokio::test]
    async fn upstream_status_names_the_failed_symbol() {
        let client = Arc::new(
            ScriptedHttpClient::new().respond("symbol=VIX", HttpResponse::with_status(503, "")),
        );
        let adapter = AlphaVantageAdapter::new(
            client,
            ApiKey::new("av-key").expect("non-blank"),
            "https://av.test",
            2_000,
        );

        let err = adapter
            .indicator(IndicatorType::Volatility, at())
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::Status);
        assert_eq!(err.symbol(), "VIX");
    }
}
