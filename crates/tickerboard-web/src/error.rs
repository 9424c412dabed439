use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tickerboard_core::{ConfigError, Endpoint, ErrorEnvelope, ServiceError, ValidationError};
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid ticker: {0}")]
    InvalidTicker(#[from] ValidationError),

    /// Query string or path segment that does not fit the route.
    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("{} failed: {source}", .endpoint.route())]
    Service {
        endpoint: Endpoint,
        source: ServiceError,
    },
}

impl ApiError {
    pub fn service(endpoint: Endpoint) -> impl FnOnce(ServiceError) -> Self {
        move |source| Self::Service { endpoint, source }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match &self {
            Self::InvalidTicker(_) | Self::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, ErrorEnvelope::new(self.to_string()))
            }
            Self::Service { endpoint, source } => {
                error!(route = endpoint.route(), "{source}");
                let envelope = if source.is_configuration() {
                    ErrorEnvelope::configuration()
                } else {
                    ErrorEnvelope::failure(*endpoint)
                };
                (StatusCode::INTERNAL_SERVER_ERROR, envelope)
            }
        };

        (status, Json(envelope)).into_response()
    }
}

/// Startup failures of [`crate::serve`].
#[derive(Error, Debug)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
