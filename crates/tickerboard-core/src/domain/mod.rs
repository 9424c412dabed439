//! # Domain Models
//!
//! Transport records produced by the aggregation layer. None of them are
//! persisted here; each one is built for a request, returned, and dropped.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`StockQuote`] | Price snapshot for one ticker |
//! | [`CompanyProfile`] | Company metadata |
//! | [`StockDetail`] | Quote + profile as served by the stock route |
//! | [`NewsItem`] | Company news headline |
//! | [`Indicator`] | Market index observation |
//! | [`IndicatorType`] | The four tracked indices |
//! | [`Symbol`] | Validated ticker |
//! | [`UtcDateTime`] | UTC instant |
//!
//! Numeric fields are finite or explicitly absent. The only zero default is
//! [`Indicator::placeholder`].

mod models;
mod symbol;
mod timestamp;

pub use models::{
    CompanyProfile, Indicator, IndicatorType, NewsItem, StockDetail, StockQuote,
};
pub use symbol::{Symbol, DEFAULT_NEWS_TICKER};
pub use timestamp::{format_iso_date, UtcDateTime};
