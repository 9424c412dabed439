mod indicators;
mod news;
mod scraps;
mod serve;
mod session;
mod stock;

use std::sync::Arc;

use tickerboard_core::ReqwestHttpClient;
use tickerboard_warehouse::{FileSession, UserId, WarehouseConfig};

use crate::cli::{Cli, Command};
use crate::dashboard::DashboardClient;
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Serve(args) => serve::run(args).await,
        Command::Indicators(args) => indicators::run(args, &dashboard(cli), cli.pretty).await,
        Command::News(args) => news::run(args, &dashboard(cli), cli.pretty).await,
        Command::Stock(args) => stock::run(args, &dashboard(cli), cli.pretty).await,
        Command::Scraps(args) => {
            let config = WarehouseConfig::default();
            let session = file_session(cli, &config)?;
            scraps::run(args, &config, &session, cli.pretty)
        }
        Command::Signin(args) => {
            session::sign_in(args, &file_session(cli, &WarehouseConfig::default())?)
        }
        Command::Signout => session::sign_out(&file_session(cli, &WarehouseConfig::default())?),
    }
}

fn dashboard(cli: &Cli) -> DashboardClient {
    DashboardClient::new(Arc::new(ReqwestHttpClient::new()), cli.server.clone())
}

fn file_session(cli: &Cli, config: &WarehouseConfig) -> Result<FileSession, CliError> {
    let fallback = cli
        .user
        .as_deref()
        .map(UserId::parse)
        .transpose()
        .map_err(|e| CliError::Command(format!("--user: {e}")))?;
    Ok(FileSession::new(config.session_path()).with_fallback_user(fallback))
}
