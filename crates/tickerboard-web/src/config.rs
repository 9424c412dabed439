use std::net::SocketAddr;

use tickerboard_core::{ConfigError, MarketConfig};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

pub const BIND_ADDR_VAR: &str = "TICKERBOARD_BIND_ADDR";
pub const REQUIRE_KEYS_VAR: &str = "TICKERBOARD_REQUIRE_KEYS";

/// Server settings, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Refuse to start when a provider key is missing.
    pub require_keys: bool,
    pub market: MarketConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_bind_addr(
            lookup(BIND_ADDR_VAR)
                .as_deref()
                .unwrap_or(DEFAULT_BIND_ADDR),
        )?;
        let require_keys = match lookup(REQUIRE_KEYS_VAR) {
            None => false,
            Some(raw) => parse_flag(REQUIRE_KEYS_VAR, &raw)?,
        };

        Ok(Self {
            bind_addr,
            require_keys,
            market: MarketConfig::from_lookup(&lookup)?,
        })
    }
}

pub fn parse_bind_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
            var: BIND_ADDR_VAR,
            value: raw.to_owned(),
            reason: e.to_string(),
        })
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_owned(),
            reason: String::from("expected true or false"),
        }),
    }
}
