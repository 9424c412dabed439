use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Upstream providers the aggregation layer talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Quotes, company profiles and company news.
    Finnhub,
    /// Index quotes for the indicators panel.
    Alphavantage,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::Finnhub, Self::Alphavantage];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Finnhub => "finnhub",
            Self::Alphavantage => "alphavantage",
        }
    }

    /// Environment variable holding this provider's secret key.
    pub const fn api_key_var(self) -> &'static str {
        match self {
            Self::Finnhub => "FINNHUB_API_KEY",
            Self::Alphavantage => "ALPHA_VANTAGE_API_KEY",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure or timeout before a response arrived.
    Unavailable,
    /// The provider answered with a non-2xx status.
    Status,
    /// The payload did not have the expected shape.
    Malformed,
}

/// Failure of one upstream call, tagged with the symbol that was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    provider: ProviderId,
    symbol: String,
    message: String,
}

impl SourceError {
    pub fn unavailable(
        provider: ProviderId,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(SourceErrorKind::Unavailable, provider, symbol, message)
    }

    pub fn status(provider: ProviderId, symbol: impl Into<String>, status: u16) -> Self {
        Self::new(
            SourceErrorKind::Status,
            provider,
            symbol,
            format!("upstream returned status {status}"),
        )
    }

    pub fn malformed(
        provider: ProviderId,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(SourceErrorKind::Malformed, provider, symbol, message)
    }

    fn new(
        kind: SourceErrorKind,
        provider: ProviderId,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            provider,
            symbol: symbol.into(),
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub const fn provider(&self) -> ProviderId {
        self.provider
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Status => "source.status",
            SourceErrorKind::Malformed => "source.malformed",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} request for {} failed: {} ({})",
            self.provider,
            self.symbol,
            self.message,
            self.code()
        )
    }
}

impl std::error::Error for SourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_provider_and_symbol() {
        let error = SourceError::status(ProviderId::Alphavantage, "SPY", 503);
        assert_eq!(
            error.to_string(),
            "alphavantage request for SPY failed: upstream returned status 503 (source.status)"
        );
        assert_eq!(error.symbol(), "SPY");
    }
}
