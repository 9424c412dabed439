use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Ticker used by the news view when the caller does not pick one.
pub const DEFAULT_NEWS_TICKER: &str = "AAPL";

/// Upper-cased ticker, safe to place in an upstream query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Trim, upper-case and validate a raw ticker.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();

        let mut chars = normalized.chars();
        match chars.next() {
            None => return Err(ValidationError::EmptySymbol),
            Some(first) if !first.is_ascii_alphabetic() => {
                return Err(ValidationError::SymbolInvalidStart { ch: first })
            }
            Some(_) => {}
        }

        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        if let Some((index, ch)) = normalized
            .chars()
            .enumerate()
            .find(|(_, ch)| !(ch.is_ascii_alphanumeric() || *ch == '.' || *ch == '-'))
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        Ok(Self(normalized))
    }

    /// Parse an optional query value, falling back to [`DEFAULT_NEWS_TICKER`]
    /// when it is absent or blank.
    pub fn parse_or_default(input: Option<&str>) -> Result<Self, ValidationError> {
        match input.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Self::parse(value),
            None => Self::parse(DEFAULT_NEWS_TICKER),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let symbol = Symbol::parse("  brk.b ").expect("symbol should parse");
        assert_eq!(symbol.as_str(), "BRK.B");
    }

    #[test]
    fn rejects_query_string_injection() {
        let err = Symbol::parse("AAPL&token=x").expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::SymbolInvalidChar { ch: '&', index: 4 }
        ));
    }

    #[test]
    fn rejects_leading_digit() {
        let err = Symbol::parse("9AAPL").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidStart { ch: '9' }));
    }

    #[test]
    fn blank_query_falls_back_to_default_ticker() {
        assert_eq!(Symbol::parse_or_default(None).expect("default").as_str(), "AAPL");
        assert_eq!(
            Symbol::parse_or_default(Some("   ")).expect("default").as_str(),
            "AAPL"
        );
        assert_eq!(
            Symbol::parse_or_default(Some("tsla")).expect("explicit").as_str(),
            "TSLA"
        );
    }
}
