use tickerboard_core::Symbol;

use crate::cli::NewsArgs;
use crate::dashboard::{DashboardClient, TickerView, ViewState};
use crate::error::CliError;
use crate::output;

pub async fn run(args: &NewsArgs, dashboard: &DashboardClient, pretty: bool) -> Result<(), CliError> {
    let ticker = Symbol::parse_or_default(args.ticker.as_deref())?;

    let mut view = TickerView::new();
    if let Some(ticker) = view.select(ticker) {
        output::render_view(view.state(), pretty)?;
        let result = dashboard.news(&ticker).await;
        view.finish(result);
    }

    match view.state() {
        ViewState::Failed(error) => Err(error.clone().into()),
        state => output::render_view(state, pretty),
    }
}
