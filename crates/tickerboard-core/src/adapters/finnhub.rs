//! Finnhub adapter: stock quotes, company profiles and company news.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use time::Date;

use super::{fetch_json, NumberOrText};
use crate::config::ApiKey;
use crate::domain::format_iso_date;
use crate::http_client::{HttpClient, HttpRequest};
use crate::{
    CompanyProfile, NewsItem, ProviderId, SourceError, StockQuote, Symbol, UtcDateTime,
    ValidationError,
};

pub const QUOTE_MAX_AGE: Duration = Duration::from_secs(60);
pub const PROFILE_MAX_AGE: Duration = Duration::from_secs(3_600);
pub const NEWS_MAX_AGE: Duration = Duration::from_secs(300);

/// News window, counted back from the request date.
pub const NEWS_LOOKBACK_DAYS: i64 = 7;

#[derive(Clone)]
pub struct FinnhubAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: ApiKey,
    base_url: String,
    timeout_ms: u64,
}

impl FinnhubAdapter {
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

    pub async fn quote(&self, symbol: &Symbol) -> Result<StockQuote, SourceError> {
        let url = format!(
            "{}/quote?symbol={}&token={}",
            self.base_url,
            symbol,
            urlencoding::encode(self.api_key.expose())
        );
        let payload: FinnhubQuotePayload = self.get(symbol, url, QUOTE_MAX_AGE).await?;
        normalize_quote(&payload).map_err(|e| shape_error(symbol, e))
    }

    pub async fn profile(&self, symbol: &Symbol) -> Result<CompanyProfile, SourceError> {
        let url = format!(
            "{}/stock/profile2?symbol={}&token={}",
            self.base_url,
            symbol,
            urlencoding::encode(self.api_key.expose())
        );
        let payload: FinnhubProfilePayload = self.get(symbol, url, PROFILE_MAX_AGE).await?;
        normalize_profile(payload).map_err(|e| shape_error(symbol, e))
    }

    /// Company news for the [`NEWS_LOOKBACK_DAYS`] ending on `today`,
    /// in provider order.
    pub async fn company_news(
        &self,
        symbol: &Symbol,
        today: Date,
    ) -> Result<Vec<NewsItem>, SourceError> {
        let from = today
            .checked_sub(time::Duration::days(NEWS_LOOKBACK_DAYS))
            .unwrap_or(today);
        let url = format!(
            "{}/company-news?symbol={}&from={}&to={}&token={}",
            self.base_url,
            symbol,
            format_iso_date(from),
            format_iso_date(today),
            urlencoding::encode(self.api_key.expose())
        );
        let payload: Vec<FinnhubNewsPayload> = self.get(symbol, url, NEWS_MAX_AGE).await?;
        normalize_news(payload, symbol).map_err(|e| shape_error(symbol, e))
    }

    async fn get<T>(&self, symbol: &Symbol, url: String, max_age: Duration) -> Result<T, SourceError>
    where
        T: serde::de::DeserializeOwned,
    {
        let request = HttpRequest::get(url)
            .with_timeout_ms(self.timeout_ms)
            .with_max_age(max_age);
        fetch_json(
            self.http_client.as_ref(),
            ProviderId::Finnhub,
            symbol.as_str(),
            request,
        )
        .await
    }
}

/// `GET /quote` body. `c` is the current price; the rest can be null.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FinnhubQuotePayload {
    #[serde(default)]
    pub c: Option<NumberOrText>,
    #[serde(default)]
    pub d: Option<NumberOrText>,
    #[serde(default)]
    pub dp: Option<NumberOrText>,
    #[serde(default)]
    pub h: Option<NumberOrText>,
    #[serde(default)]
    pub l: Option<NumberOrText>,
    #[serde(default)]
    pub o: Option<NumberOrText>,
    #[serde(default)]
    pub pc: Option<NumberOrText>,
}

/// `GET /stock/profile2` body. Unknown tickers yield `{}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinnhubProfilePayload {
    pub name: Option<String>,
    pub finnhub_industry: Option<String>,
    pub logo: Option<String>,
    pub market_capitalization: Option<NumberOrText>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub ipo: Option<String>,
    pub weburl: Option<String>,
}

/// One element of the `GET /company-news` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FinnhubNewsPayload {
    pub headline: String,
    /// Sent as `null` for some articles.
    #[serde(default)]
    pub summary: Option<String>,
    pub url: String,
    #[serde(default)]
    pub source: Option<String>,
    /// Unix seconds.
    pub datetime: i64,
    #[serde(default)]
    pub image: Option<String>,
}

pub fn normalize_quote(payload: &FinnhubQuotePayload) -> Result<StockQuote, ValidationError> {
    let price = payload
        .c
        .as_ref()
        .ok_or(ValidationError::MissingField { field: "c" })?
        .to_f64("c")?;

    let optional = |value: &Option<NumberOrText>, field: &'static str| {
        value.as_ref().map(|v| v.to_f64(field)).transpose()
    };

    StockQuote::new(
        price,
        optional(&payload.d, "d")?,
        optional(&payload.dp, "dp")?,
        optional(&payload.h, "h")?,
        optional(&payload.l, "l")?,
        optional(&payload.o, "o")?,
        optional(&payload.pc, "pc")?,
    )
}

pub fn normalize_profile(payload: FinnhubProfilePayload) -> Result<CompanyProfile, ValidationError> {
    let market_cap = payload
        .market_capitalization
        .as_ref()
        .map(|value| value.to_f64("marketCapitalization"))
        .transpose()?;

    Ok(CompanyProfile {
        name: non_empty(payload.name),
        industry: non_empty(payload.finnhub_industry),
        logo: non_empty(payload.logo),
        market_cap,
        country: non_empty(payload.country),
        currency: non_empty(payload.currency),
        exchange: non_empty(payload.exchange),
        ipo: non_empty(payload.ipo),
        weburl: non_empty(payload.weburl),
    })
}

/// Map provider news into [`NewsItem`]s, keeping provider order. The
/// provider does not report related tickers reliably, so every item is
/// tagged with the queried ticker alone.
pub fn normalize_news(
    payload: Vec<FinnhubNewsPayload>,
    queried: &Symbol,
) -> Result<Vec<NewsItem>, ValidationError> {
    payload
        .into_iter()
        .map(|item| {
            Ok(NewsItem {
                title: item.headline,
                description: item.summary.unwrap_or_default(),
                url: item.url,
                source: item.source.unwrap_or_default(),
                author: None,
                published_at: UtcDateTime::from_unix_seconds(item.datetime)?,
                image_url: non_empty(item.image),
                tickers: vec![queried.clone()],
            })
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn shape_error(symbol: &Symbol, error: ValidationError) -> SourceError {
    SourceError::malformed(ProviderId::Finnhub, symbol.as_str(), error.to_string())
}
