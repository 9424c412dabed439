use std::time::Duration;

use tickerboard_core::Indicator;
use tracing::info;

use crate::cli::IndicatorsArgs;
use crate::dashboard::{DashboardClient, PollHandle, ViewState};
use crate::error::CliError;
use crate::output;

pub async fn run(
    args: &IndicatorsArgs,
    dashboard: &DashboardClient,
    pretty: bool,
) -> Result<(), CliError> {
    if !args.watch {
        let indicators = dashboard.market_indicators().await?;
        output::render(&indicators, pretty)?;
        if let Some(warning) = placeholder_warning(&indicators) {
            eprintln!("{warning}");
        }
        return Ok(());
    }

    let client = dashboard.clone();
    let mut poll = PollHandle::spawn(Duration::from_secs(args.interval_secs), move || {
        let client = client.clone();
        async move { client.market_indicators().await }
    });
    info!(interval_secs = args.interval_secs, "watching market indicators");

    loop {
        let changed = tokio::select! {
            changed = poll.changed() => changed,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted; stopping indicator refresh");
                false
            }
        };
        if !changed {
            break;
        }

        let state = poll.current().clone();
        output::render_view(&state, pretty)?;
        if let ViewState::Loaded(indicators) = &state {
            if let Some(warning) = placeholder_warning(indicators) {
                eprintln!("{warning}");
            }
        }
    }

    poll.stop();
    Ok(())
}

/// Names the indicators shown as zero placeholders, if any.
fn placeholder_warning(indicators: &[Indicator]) -> Option<String> {
    let names: Vec<&str> = indicators
        .iter()
        .filter(|indicator| indicator.is_placeholder())
        .map(|indicator| indicator.indicator_type.display_name())
        .collect();
    if names.is_empty() {
        return None;
    }
    Some(format!("warning: {} unavailable, showing zeros", names.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickerboard_core::{IndicatorType, UtcDateTime};

    #[test]
    fn warning_names_the_placeholder_indicators() {
        let at = UtcDateTime::parse("2024-03-08T14:30:00Z").expect("valid");
        let indicators = vec![
            Indicator::new(IndicatorType::BroadMarket, 512.34, -2.1, -0.41, at).expect("valid"),
            Indicator::placeholder(IndicatorType::Tech, at),
            Indicator::placeholder(IndicatorType::Volatility, at),
        ];

        assert_eq!(
            placeholder_warning(&indicators).as_deref(),
            Some("warning: NASDAQ, VIX unavailable, showing zeros")
        );
        assert_eq!(placeholder_warning(&indicators[..1]), None);
    }
}
