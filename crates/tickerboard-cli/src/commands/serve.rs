use std::sync::Arc;

use tickerboard_core::ReqwestHttpClient;
use tickerboard_web::config::parse_bind_addr;
use tickerboard_web::ServerConfig;

use crate::cli::ServeArgs;
use crate::error::CliError;

pub async fn run(args: &ServeArgs) -> Result<(), CliError> {
    let mut config = ServerConfig::from_env()?;
    if let Some(bind) = &args.bind {
        config.bind_addr = parse_bind_addr(bind)?;
    }
    config.require_keys |= args.require_keys;

    tickerboard_web::serve(config, Arc::new(ReqwestHttpClient::new())).await?;
    Ok(())
}
