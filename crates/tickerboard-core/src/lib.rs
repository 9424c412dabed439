//! # Tickerboard Core
//!
//! Market-data aggregation and normalization for the tickerboard dashboard.
//!
//! ## Overview
//!
//! This crate fetches quotes, company profiles, company news and index
//! proxies from two upstream providers and turns their payloads into a
//! small set of canonical records:
//!
//! - **Canonical domain models** for quotes, profiles, news and indicators
//! - **Provider adapters** that own every piece of upstream shape knowledge
//! - **Aggregation service** with per-endpoint failure policies
//! - **Error envelope** and freshness hints shared with the HTTP layer
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Finnhub and Alpha Vantage clients plus pure normalizers |
//! | [`config`] | Provider secrets, base URLs and upstream timeout |
//! | [`domain`] | Domain models (StockDetail, NewsItem, Indicator, Symbol) |
//! | [`envelope`] | Endpoint catalogue and `{error}` envelope |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`service`] | Request-scoped aggregation |
//! | [`source`] | Provider identifiers and upstream failures |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickerboard_core::{MarketConfig, MarketService, ReqwestHttpClient, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MarketConfig::from_env()?;
//!     let service = MarketService::new(Arc::new(config), Arc::new(ReqwestHttpClient::new()));
//!
//!     let detail = service.stock_detail(&Symbol::parse("AAPL")?).await?;
//!     println!("{} last {:.2}", detail.ticker, detail.price);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  HTTP routes    │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ MarketService   │────▶│ MarketConfig     │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Provider        │────▶│ HTTP Client      │
//! │ Adapters        │     │ (reqwest/script) │
//! └─────────────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Domain Models   │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use tickerboard_core::{ErrorEnvelope, ServiceError, Endpoint};
//!
//! fn envelope_for(endpoint: Endpoint, error: &ServiceError) -> ErrorEnvelope {
//!     if error.is_configuration() {
//!         ErrorEnvelope::configuration()
//!     } else {
//!         ErrorEnvelope::failure(endpoint)
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - API keys are read from the environment only and never logged
//! - Logged URLs have `token` and `apikey` values masked

pub mod adapters;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod service;
pub mod source;

pub use adapters::{AlphaVantageAdapter, FinnhubAdapter};

pub use config::{ApiKey, ConfigError, MarketConfig, ProviderConfig};

pub use domain::{
    format_iso_date, CompanyProfile, Indicator, IndicatorType, NewsItem, StockDetail, StockQuote,
    Symbol, UtcDateTime, DEFAULT_NEWS_TICKER,
};

pub use envelope::{Endpoint, ErrorEnvelope, CONFIG_ERROR_MESSAGE};

pub use error::ValidationError;

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, ScriptedHttpClient,
};

pub use service::{MarketService, ServiceError};

pub use source::{ProviderId, SourceError, SourceErrorKind};
