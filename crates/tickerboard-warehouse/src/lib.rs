//! # Tickerboard Warehouse
//!
//! DuckDB-backed row store for the dashboard's saved items ("scraps") and
//! the session file that identifies the signed-in user.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tickerboard_warehouse::{ContentType, NewScrap, ScrapStore, UserId, Warehouse};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let warehouse = Warehouse::open_default()?;
//!     let user = UserId::parse("demo-user")?;
//!
//!     warehouse.insert_scrap(&user, NewScrap::new(ContentType::News, "https://news.test/1")?)?;
//!     for scrap in warehouse.list_scraps(&user)? {
//!         println!("{} {} {}", scrap.created_at, scrap.content_type, scrap.content_id);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `stocks` | Tickers a user has looked at |
//! | `news` | News items available for bookmarking |
//! | `market_indicators` | Indicator observations |
//! | `user_scraps` | Per-user bookmarks, newest first |
//!
//! Every statement that carries user input is parameterized.

pub mod migrations;
pub mod scraps;
pub mod session;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ::duckdb::Connection;
use thiserror::Error;
use tracing::debug;

pub use scraps::{ContentType, NewScrap, Scrap, ScrapStore};
pub use session::{FileSession, SessionProvider, UserId};

/// Errors that can occur during warehouse operations.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (database directory, session file).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Session file could not be encoded or decoded.
    #[error("session file is corrupt: {0}")]
    Session(#[from] serde_json::Error),

    /// A record failed validation before reaching the database.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// Configuration for the warehouse database.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Root directory for tickerboard data.
    pub tickerboard_home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self::under(resolve_tickerboard_home())
    }
}

impl WarehouseConfig {
    /// Standard layout below `home`.
    pub fn under(home: impl Into<PathBuf>) -> Self {
        let tickerboard_home = home.into();
        let db_path = tickerboard_home.join("store").join("scraps.duckdb");
        Self {
            tickerboard_home,
            db_path,
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.tickerboard_home.join("session.json")
    }
}

/// Handle to the row store. Clones share one connection.
#[derive(Clone)]
pub struct Warehouse {
    config: WarehouseConfig,
    connection: Arc<Mutex<Connection>>,
}

impl Warehouse {
    /// Open a warehouse with default configuration.
    pub fn open_default() -> Result<Self, WarehouseError> {
        Self::open(WarehouseConfig::default())
    }

    /// Open (creating if needed) the database file and apply migrations.
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let connection = Connection::open(&config.db_path)?;
        let warehouse = Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        };
        warehouse.initialize()?;
        Ok(warehouse)
    }

    /// Apply pending schema migrations.
    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.connection();
        migrations::apply_migrations(&connection)?;
        debug!(db_path = %self.config.db_path.display(), "warehouse schema ready");
        Ok(())
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    /// Get the path to the database file.
    pub fn db_path(&self) -> &Path {
        &self.config.db_path
    }

    /// Names of the user tables, sorted.
    pub fn table_names(&self) -> Result<Vec<String>, WarehouseError> {
        let connection = self.connection();
        let mut statement = connection.prepare(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'main' ORDER BY table_name",
        )?;
        let names = statement
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    pub(crate) fn connection(&self) -> MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Finalize a transaction, committing on success or rolling back on failure.
pub(crate) fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, WarehouseError>,
) -> Result<T, WarehouseError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

fn resolve_tickerboard_home() -> PathBuf {
    if let Some(path) = env::var_os("TICKERBOARD_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".tickerboard");
    }

    PathBuf::from(".tickerboard")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn initializes_all_tables() {
        let temp = tempdir().expect("tempdir");
        let warehouse =
            Warehouse::open(WarehouseConfig::under(temp.path().join("home"))).expect("warehouse open");

        let tables = warehouse.table_names().expect("tables");
        for expected in ["market_indicators", "news", "schema_migrations", "stocks", "user_scraps"] {
            assert!(tables.iter().any(|t| t == expected), "missing table {expected}");
        }
        assert!(warehouse.db_path().ends_with("store/scraps.duckdb"));
    }

    #[test]
    fn reopening_does_not_reapply_migrations() {
        let temp = tempdir().expect("tempdir");
        let config = WarehouseConfig::under(temp.path());

        drop(Warehouse::open(config.clone()).expect("first open"));
        let warehouse = Warehouse::open(config).expect("second open");

        let applied: i64 = warehouse
            .connection()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .expect("count");
        assert_eq!(applied, migrations::latest_version_count() as i64);
    }
}
