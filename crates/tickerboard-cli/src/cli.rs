//! CLI argument definitions for tickerboard.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run the HTTP aggregation endpoints |
//! | `indicators` | Market indicators view (optionally polling) |
//! | `news` | Company news view |
//! | `stock` | Stock detail view |
//! | `scraps` | List, add or remove saved items |
//! | `signin` | Start a session for a user |
//! | `signout` | End the current session |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--server` | `http://127.0.0.1:3000` | Aggregation server the views read from |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--user` | `$TICKERBOARD_USER` | User assumed when no session exists |
//!
//! # Examples
//!
//! ```bash
//! tickerboard serve --bind 127.0.0.1:3000
//! tickerboard indicators --watch --interval-secs 60
//! tickerboard news --ticker MSFT --pretty
//! tickerboard scraps add --type news --content-id https://news.test/1 --note "read later"
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickerboard_warehouse::ContentType;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

/// Stock dashboard: market indicators, company news and stock details.
#[derive(Debug, Parser)]
#[command(name = "tickerboard", author, version, about)]
pub struct Cli {
    /// Base URL of the aggregation server.
    #[arg(long, global = true, env = "TICKERBOARD_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// User assumed signed in when no session file exists.
    #[arg(long, global = true, env = "TICKERBOARD_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP aggregation endpoints.
    ///
    ///   tickerboard serve
    ///   tickerboard serve --bind 127.0.0.1:8080 --require-keys
    Serve(ServeArgs),

    /// Show market indicators (S&P 500, NASDAQ, Dow Jones, VIX).
    ///
    ///   tickerboard indicators
    ///   tickerboard indicators --watch --interval-secs 30
    Indicators(IndicatorsArgs),

    /// Show recent company news for a ticker.
    News(NewsArgs),

    /// Show quote and company profile for a ticker.
    Stock(StockArgs),

    /// Manage saved items for the signed-in user.
    Scraps(ScrapsArgs),

    /// Start a session for USER.
    Signin(SigninArgs),

    /// End the current session.
    Signout,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address; overrides TICKERBOARD_BIND_ADDR.
    #[arg(long)]
    pub bind: Option<String>,

    /// Refuse to start when a provider API key is missing.
    #[arg(long, default_value_t = false)]
    pub require_keys: bool,
}

#[derive(Debug, Args)]
pub struct IndicatorsArgs {
    /// Keep refreshing until interrupted.
    #[arg(long, default_value_t = false)]
    pub watch: bool,

    /// Refresh period in seconds when watching.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,
}

#[derive(Debug, Args)]
pub struct NewsArgs {
    /// Ticker to show news for (default: AAPL).
    #[arg(long)]
    pub ticker: Option<String>,
}

#[derive(Debug, Args)]
pub struct StockArgs {
    /// Ticker symbol, e.g. AAPL.
    pub ticker: String,
}

#[derive(Debug, Args)]
pub struct ScrapsArgs {
    #[command(subcommand)]
    pub command: ScrapsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScrapsCommand {
    /// List saved items, newest first.
    List,

    /// Save an item.
    Add(ScrapAddArgs),

    /// Delete a saved item by id.
    Remove(ScrapRemoveArgs),
}

#[derive(Debug, Args)]
pub struct ScrapAddArgs {
    #[arg(long = "type", value_enum)]
    pub content_type: ContentTypeArg,

    /// Identifier of the saved item (news URL, indicator code).
    #[arg(long)]
    pub content_id: String,

    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Debug, Args)]
pub struct ScrapRemoveArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct SigninArgs {
    pub user: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContentTypeArg {
    News,
    Indicator,
}

impl From<ContentTypeArg> for ContentType {
    fn from(value: ContentTypeArg) -> Self {
        match value {
            ContentTypeArg::News => Self::News,
            ContentTypeArg::Indicator => Self::Indicator,
        }
    }
}
