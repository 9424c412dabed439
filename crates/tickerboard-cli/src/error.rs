use thiserror::Error;

use crate::dashboard::DashboardError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tickerboard_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Config(#[from] tickerboard_core::ConfigError),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("not signed in; run `tickerboard signin <USER>` or set TICKERBOARD_USER")]
    NotSignedIn,

    #[error(transparent)]
    Store(#[from] tickerboard_warehouse::WarehouseError),

    #[error(transparent)]
    Serve(#[from] tickerboard_web::ServeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Config(_) => 2,
            Self::Dashboard(DashboardError::Decode(_)) => 4,
            Self::Dashboard(_) => 3,
            Self::Serialization(_) => 4,
            Self::NotSignedIn => 6,
            Self::Store(tickerboard_warehouse::WarehouseError::InvalidRecord(_)) => 2,
            Self::Store(_) => 7,
            Self::Serve(tickerboard_web::ServeError::Config(_)) => 2,
            Self::Serve(_) => 10,
            Self::Io(_) => 10,
        }
    }
}
