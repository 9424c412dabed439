//! Request-scoped aggregation over the provider adapters.
//!
//! | Operation | Upstream calls | On upstream failure |
//! |-----------|----------------|---------------------|
//! | [`MarketService::market_indicators`] | 4 Alpha Vantage quotes, concurrent | placeholder for that indicator |
//! | [`MarketService::news`] | 1 Finnhub company news | whole operation fails |
//! | [`MarketService::stock_detail`] | Finnhub quote and profile, concurrent | whole operation fails |
//!
//! A missing secret is checked before any call is made.

use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use time::Date;
use tracing::{info, warn};

use crate::adapters::{AlphaVantageAdapter, FinnhubAdapter};
use crate::config::{ApiKey, MarketConfig};
use crate::http_client::HttpClient;
use crate::{
    Indicator, IndicatorType, NewsItem, ProviderId, SourceError, StockDetail, Symbol,
    UtcDateTime,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{provider} API key not configured (set {var})", var = .provider.api_key_var())]
    MissingApiKey { provider: ProviderId },

    #[error(transparent)]
    Upstream(#[from] SourceError),
}

impl ServiceError {
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingApiKey { .. })
    }
}

/// Stateless facade the HTTP layer calls into. Cloning is cheap.
#[derive(Clone)]
pub struct MarketService {
    config: Arc<MarketConfig>,
    http_client: Arc<dyn HttpClient>,
}

impl MarketService {
    pub fn new(config: Arc<MarketConfig>, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// One indicator per [`IndicatorType`], in [`IndicatorType::ALL`] order.
    pub async fn market_indicators(&self) -> Result<Vec<Indicator>, ServiceError> {
        let adapter = self.alphavantage()?;

        let fetches = IndicatorType::ALL.into_iter().map(|indicator_type| {
            let adapter = &adapter;
            async move {
                let attempted_at = UtcDateTime::now();
                match adapter.indicator(indicator_type, attempted_at).await {
                    Ok(indicator) => indicator,
                    Err(error) => {
                        warn!(
                            indicator = %indicator_type,
                            code = error.code(),
                            "substituting placeholder: {error}"
                        );
                        Indicator::placeholder(indicator_type, attempted_at)
                    }
                }
            }
        });

        Ok(join_all(fetches).await)
    }

    /// Company news for the seven days up to today (UTC).
    pub async fn news(&self, ticker: &Symbol) -> Result<Vec<NewsItem>, ServiceError> {
        self.news_until(ticker, UtcDateTime::now().date()).await
    }

    pub async fn news_until(&self, ticker: &Symbol, today: Date) -> Result<Vec<NewsItem>, ServiceError> {
        let adapter = self.finnhub()?;
        let items = adapter.company_news(ticker, today).await?;
        info!(%ticker, count = items.len(), "fetched company news");
        Ok(items)
    }

    /// Quote and profile fetched concurrently; either failure fails both.
    pub async fn stock_detail(&self, ticker: &Symbol) -> Result<StockDetail, ServiceError> {
        let adapter = self.finnhub()?;
        let (quote, profile) = tokio::try_join!(adapter.quote(ticker), adapter.profile(ticker))?;
        Ok(StockDetail::combine(ticker.clone(), quote, profile))
    }

    fn finnhub(&self) -> Result<FinnhubAdapter, ServiceError> {
        let api_key = self.api_key(ProviderId::Finnhub)?;
        Ok(FinnhubAdapter::new(
            Arc::clone(&self.http_client),
            api_key,
            self.config.finnhub.base_url.clone(),
            self.config.upstream_timeout_ms,
        ))
    }

    fn alphavantage(&self) -> Result<AlphaVantageAdapter, ServiceError> {
        let api_key = self.api_key(ProviderId::Alphavantage)?;
        Ok(AlphaVantageAdapter::new(
            Arc::clone(&self.http_client),
            api_key,
            self.config.alphavantage.base_url.clone(),
            self.config.upstream_timeout_ms,
        ))
    }

    fn api_key(&self, provider: ProviderId) -> Result<ApiKey, ServiceError> {
        self.config
            .provider(provider)
            .api_key
            .clone()
            .ok_or(ServiceError::MissingApiKey { provider })
    }
}
