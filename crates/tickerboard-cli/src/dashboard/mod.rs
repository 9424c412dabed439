//! Presentation layer: reads the aggregation endpoints and tracks what each
//! view currently shows.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`DashboardClient`] | Typed calls to the three endpoints |
//! | [`ViewState`] | Loading / failed / loaded state of one view |
//! | [`TickerView`] | Re-fetches only when the selected ticker changes |
//! | [`PollHandle`] | Owned periodic refresh, cancelled on drop |

mod poller;
mod view;

pub use poller::PollHandle;
pub use view::{TickerView, ViewState};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tickerboard_core::{
    Endpoint, ErrorEnvelope, HttpClient, HttpRequest, Indicator, NewsItem, StockDetail, Symbol,
};
use tracing::debug;

/// Upper bound for one dashboard request, covering the server's own upstream calls.
const REQUEST_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DashboardError {
    /// The endpoint answered with an error envelope.
    #[error("{message} (HTTP {status})")]
    Endpoint { status: u16, message: String },

    #[error("server unreachable: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl DashboardError {
    /// Banner text for the view.
    pub fn banner(&self) -> &str {
        match self {
            Self::Endpoint { message, .. } => message,
            Self::Transport(message) | Self::Decode(message) => message,
        }
    }
}

/// Client for the aggregation endpoints.
#[derive(Clone)]
pub struct DashboardClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
}

impl DashboardClient {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub async fn market_indicators(&self) -> Result<Vec<Indicator>, DashboardError> {
        self.get(Endpoint::MarketIndicators.route().to_owned()).await
    }

    pub async fn news(&self, ticker: &Symbol) -> Result<Vec<NewsItem>, DashboardError> {
        self.get(format!("{}?ticker={ticker}", Endpoint::News.route()))
            .await
    }

    pub async fn stock(&self, ticker: &Symbol) -> Result<StockDetail, DashboardError> {
        self.get(format!("{}/{ticker}", Endpoint::Stock.route()))
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: String) -> Result<T, DashboardError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "dashboard request");

        let response = self
            .http_client
            .execute(HttpRequest::get(url).with_timeout_ms(REQUEST_TIMEOUT_MS))
            .await
            .map_err(|e| DashboardError::Transport(e.message().to_owned()))?;

        if !response.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&response.body)
                .map(|envelope| envelope.error)
                .unwrap_or_else(|_| format!("request failed with status {}", response.status));
            return Err(DashboardError::Endpoint {
                status: response.status,
                message,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| DashboardError::Decode(e.to_string()))
    }
}
