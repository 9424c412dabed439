use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime, ValidationError};

/// Market indicator tracked by the dashboard's indices panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorType {
    /// S&P 500.
    #[serde(rename = "GSPC")]
    BroadMarket,
    /// NASDAQ Composite.
    #[serde(rename = "IXIC")]
    Tech,
    /// Dow Jones Industrial Average.
    #[serde(rename = "DJI")]
    Industrial,
    /// CBOE volatility index.
    #[serde(rename = "VIX")]
    Volatility,
}

impl IndicatorType {
    /// Fixed panel order; the indicators endpoint answers in exactly this order.
    pub const ALL: [Self; 4] = [
        Self::BroadMarket,
        Self::Tech,
        Self::Industrial,
        Self::Volatility,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Self::BroadMarket => "GSPC",
            Self::Tech => "IXIC",
            Self::Industrial => "DJI",
            Self::Volatility => "VIX",
        }
    }

    /// Upstream symbol quoted in place of the index itself (ETF proxies).
    pub const fn proxy_symbol(self) -> &'static str {
        match self {
            Self::BroadMarket => "SPY",
            Self::Tech => "QQQ",
            Self::Industrial => "DIA",
            Self::Volatility => "VIX",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::BroadMarket => "S&P 500",
            Self::Tech => "NASDAQ",
            Self::Industrial => "Dow Jones",
            Self::Volatility => "VIX",
        }
    }
}

impl Display for IndicatorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One observation of a market indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub indicator_type: IndicatorType,
    pub value: f64,
    pub change_value: f64,
    pub change_percent: f64,
    pub recorded_at: UtcDateTime,
}

impl Indicator {
    pub fn new(
        indicator_type: IndicatorType,
        value: f64,
        change_value: f64,
        change_percent: f64,
        recorded_at: UtcDateTime,
    ) -> Result<Self, ValidationError> {
        validate_finite("value", value)?;
        validate_finite("change_value", change_value)?;
        validate_finite("change_percent", change_percent)?;

        Ok(Self {
            indicator_type,
            value,
            change_value,
            change_percent,
            recorded_at,
        })
    }

    /// Zero-valued stand-in used when a single indicator cannot be fetched or parsed.
    pub fn placeholder(indicator_type: IndicatorType, attempted_at: UtcDateTime) -> Self {
        Self {
            indicator_type,
            value: 0.0,
            change_value: 0.0,
            change_percent: 0.0,
            recorded_at: attempted_at,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value == 0.0 && self.change_value == 0.0 && self.change_percent == 0.0
    }
}

/// Price snapshot for a single ticker. Only `price` is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub price: f64,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub open: Option<f64>,
    pub previous_close: Option<f64>,
}

impl StockQuote {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        price: f64,
        change: Option<f64>,
        change_percent: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        open: Option<f64>,
        previous_close: Option<f64>,
    ) -> Result<Self, ValidationError> {
        validate_finite("price", price)?;
        validate_optional_finite("change", change)?;
        validate_optional_finite("change_percent", change_percent)?;
        validate_optional_finite("high", high)?;
        validate_optional_finite("low", low)?;
        validate_optional_finite("open", open)?;
        validate_optional_finite("previous_close", previous_close)?;

        Ok(Self {
            price,
            change,
            change_percent,
            high,
            low,
            open,
            previous_close,
        })
    }
}

/// Company metadata. Providers return an empty object for unknown tickers,
/// so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub logo: Option<String>,
    pub market_cap: Option<f64>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub ipo: Option<String>,
    pub weburl: Option<String>,
}

/// Quote and profile combined into the stock detail payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDetail {
    pub ticker: Symbol,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub price: f64,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub open: Option<f64>,
    pub previous_close: Option<f64>,
    pub logo: Option<String>,
    pub market_cap: Option<f64>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub ipo: Option<String>,
    pub weburl: Option<String>,
}

impl StockDetail {
    pub fn combine(ticker: Symbol, quote: StockQuote, profile: CompanyProfile) -> Self {
        Self {
            ticker,
            name: profile.name,
            // The provider only classifies by industry; it doubles as the sector.
            sector: profile.industry.clone(),
            industry: profile.industry,
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            high: quote.high,
            low: quote.low,
            open: quote.open,
            previous_close: quote.previous_close,
            logo: profile.logo,
            market_cap: profile.market_cap,
            country: profile.country,
            currency: profile.currency,
            exchange: profile.exchange,
            ipo: profile.ipo,
            weburl: profile.weburl,
        }
    }
}

/// A company news headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub author: Option<String>,
    pub published_at: UtcDateTime,
    pub image_url: Option<String>,
    pub tickers: Vec<Symbol>,
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn validate_optional_finite(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        validate_finite(field, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_types_serialize_as_index_codes() {
        let codes = IndicatorType::ALL
            .iter()
            .map(|kind| serde_json::to_value(kind).expect("serializable"))
            .collect::<Vec<_>>();
        assert_eq!(
            codes,
            vec![
                serde_json::json!("GSPC"),
                serde_json::json!("IXIC"),
                serde_json::json!("DJI"),
                serde_json::json!("VIX"),
            ]
        );
    }

    #[test]
    fn rejects_non_finite_quote_price() {
        let err = StockQuote::new(f64::NAN, None, None, None, None, None, None)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::NonFiniteValue { field: "price" }));
    }

    #[test]
    fn stock_detail_uses_camel_case_keys() {
        let quote = StockQuote::new(189.5, Some(1.5), Some(0.8), None, None, None, Some(188.0))
            .expect("valid quote");
        let detail = StockDetail::combine(
            Symbol::parse("AAPL").expect("valid"),
            quote,
            CompanyProfile {
                industry: Some(String::from("Technology")),
                ..CompanyProfile::default()
            },
        );

        let json = serde_json::to_value(&detail).expect("serializable");
        assert_eq!(json["changePercent"], serde_json::json!(0.8));
        assert_eq!(json["previousClose"], serde_json::json!(188.0));
        assert_eq!(json["sector"], json["industry"]);
        assert!(json["marketCap"].is_null());
    }
}
