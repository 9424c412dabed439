//! HTTP surface for the tickerboard aggregation layer.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /api/market-indicators` | [`routes::market_indicators_handler`] |
//! | `GET /api/news?ticker=X` | [`routes::news_handler`] |
//! | `GET /api/stock/:ticker` | [`routes::stock_handler`] |
//! | `GET /health` | [`routes::health_handler`] |
//!
//! Successful responses carry `Cache-Control: public, max-age=N`. Failures
//! carry `{ "error": "..." }` with a fixed message; causes go to the log.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tickerboard_core::HttpClient;
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ServeError};
pub use state::AppState;

use routes::{health_handler, market_indicators_handler, news_handler, stock_handler};

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/market-indicators", get(market_indicators_handler))
        .route("/api/news", get(news_handler))
        .route("/api/stock/:ticker", get(stock_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind, serve until SIGINT/SIGTERM, then drain.
pub async fn serve(config: ServerConfig, http_client: Arc<dyn HttpClient>) -> Result<(), ServeError> {
    if config.require_keys {
        config.market.require_keys()?;
    }
    for provider in config.market.missing_keys() {
        warn!(
            %provider,
            var = provider.api_key_var(),
            "API key not configured; dependent routes will answer 500"
        );
    }

    let state = AppState::new(config.market, http_client);
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: config.bind_addr,
            source,
        })?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
