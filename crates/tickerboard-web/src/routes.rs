use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::header::CACHE_CONTROL,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tickerboard_core::{Endpoint, ProviderId, Symbol};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub ticker: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Health {
    pub status: String,
    pub finnhub_configured: bool,
    pub alphavantage_configured: bool,
}

pub async fn market_indicators_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let indicators = state
        .service
        .market_indicators()
        .await
        .map_err(ApiError::service(Endpoint::MarketIndicators))?;

    let placeholders = indicators.iter().filter(|i| i.is_placeholder()).count();
    info!(placeholders, "served market indicators");
    Ok(with_freshness(Endpoint::MarketIndicators, Json(indicators)))
}

pub async fn news_handler(
    State(state): State<AppState>,
    query: Result<Query<NewsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let ticker = Symbol::parse_or_default(query.ticker.as_deref())?;
    let items = state
        .service
        .news(&ticker)
        .await
        .map_err(ApiError::service(Endpoint::News))?;

    Ok(with_freshness(Endpoint::News, Json(items)))
}

pub async fn stock_handler(
    State(state): State<AppState>,
    ticker: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(ticker) = ticker?;
    let ticker = Symbol::parse(&ticker)?;
    let detail = state
        .service
        .stock_detail(&ticker)
        .await
        .map_err(ApiError::service(Endpoint::Stock))?;

    Ok(with_freshness(Endpoint::Stock, Json(detail)))
}

pub async fn health_handler(State(state): State<AppState>) -> Json<Health> {
    let config = state.service.config();
    Json(Health {
        status: String::from("ok"),
        finnhub_configured: config.is_configured(ProviderId::Finnhub),
        alphavantage_configured: config.is_configured(ProviderId::Alphavantage),
    })
}

fn with_freshness(endpoint: Endpoint, body: impl IntoResponse) -> Response {
    ([(CACHE_CONTROL, endpoint.cache_control())], body).into_response()
}
