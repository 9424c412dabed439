use tickerboard_core::Symbol;

use super::DashboardError;

/// What a view renders right now.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    /// Rendered as an error banner.
    Failed(DashboardError),
    Loaded(T),
}

impl<T> ViewState<T> {
    pub fn from_result(result: Result<T, DashboardError>) -> Self {
        match result {
            Ok(data) => Self::Loaded(data),
            Err(error) => Self::Failed(error),
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// A view bound to one ticker at a time.
///
/// Selecting the ticker it already shows is a no-op. Selecting a different
/// one puts the view in [`ViewState::Loading`] until [`TickerView::finish`]
/// delivers the fetch result.
#[derive(Debug)]
pub struct TickerView<T> {
    ticker: Option<Symbol>,
    state: ViewState<T>,
}

impl<T> Default for TickerView<T> {
    fn default() -> Self {
        Self {
            ticker: None,
            state: ViewState::Loading,
        }
    }
}

impl<T> TickerView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticker(&self) -> Option<&Symbol> {
        self.ticker.as_ref()
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Returns the ticker to fetch, or `None` when it is already shown.
    pub fn select(&mut self, ticker: Symbol) -> Option<Symbol> {
        if self.ticker.as_ref() == Some(&ticker) {
            return None;
        }
        self.ticker = Some(ticker.clone());
        self.state = ViewState::Loading;
        Some(ticker)
    }

    pub fn finish(&mut self, result: Result<T, DashboardError>) -> &ViewState<T> {
        self.state = ViewState::from_result(result);
        &self.state
    }
}
