use std::sync::Arc;

use tickerboard_core::{HttpClient, MarketConfig, MarketService};

/// Shared by every handler. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub service: MarketService,
}

impl AppState {
    pub fn new(config: MarketConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            service: MarketService::new(Arc::new(config), http_client),
        }
    }
}
