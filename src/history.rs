//! Durable record of already-posted links.
//!
//! A single SQLite table keyed by URL:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS Links (
//!     url  TEXT PRIMARY KEY,
//!     time TIMESTAMP DEFAULT CURRENT_TIMESTAMP
//! )
//! ```
//!
//! Rows are append-only and never expire. The timestamp is defaulted by the
//! database, not supplied by callers. Other invocations of the program may
//! touch the same file at overlapping times; the check in
//! [`LinkHistory::has_been_posted`] and a later [`LinkHistory::record_posted`]
//! are not atomic together, and that race window is accepted.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, instrument};

use crate::error::BotError;
use crate::models::ExecutionMode;

const CREATE_LINKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS Links ( \
     url  TEXT PRIMARY KEY, \
     time TIMESTAMP DEFAULT CURRENT_TIMESTAMP \
 )";

/// Keeps track of which links have been posted.
#[derive(Debug)]
pub struct LinkHistory {
    pool: SqlitePool,
    mode: ExecutionMode,
}

impl LinkHistory {
    /// Open (or create) the SQLite database at `path` and ensure the schema.
    ///
    /// Schema creation is lazy and idempotent; no separate provisioning step
    /// exists. An unreachable or unwritable file is a fatal
    /// [`BotError::Storage`].
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn open(path: &Path, mode: ExecutionMode) -> Result<Self, BotError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let history = LinkHistory { pool, mode };
        history.ensure_schema().await?;
        Ok(history)
    }

    /// Open an in-memory database. Used by tests and throwaway runs.
    pub async fn open_in_memory(mode: ExecutionMode) -> Result<Self, BotError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // One connection, or each query would see its own empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let history = LinkHistory { pool, mode };
        history.ensure_schema().await?;
        Ok(history)
    }

    async fn ensure_schema(&self) -> Result<(), BotError> {
        sqlx::query(CREATE_LINKS_TABLE).execute(&self.pool).await?;
        debug!("Links table ready");
        Ok(())
    }

    /// Check whether `url` has already been posted.
    pub async fn has_been_posted(&self, url: &str) -> Result<bool, BotError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Links WHERE url = ?")
            .bind(url)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Record `url` as posted.
    ///
    /// In dry-run mode nothing is persisted, but the would-be insert is still
    /// logged so a dry run leaves a full audit trail. The insert ignores an
    /// existing row rather than erroring, so recording the same URL twice
    /// never creates a second entry.
    #[instrument(level = "debug", skip(self))]
    pub async fn record_posted(&self, url: &str) -> Result<(), BotError> {
        if self.mode.is_dry_run() {
            info!(%url, "dry run: would insert into Links");
            return Ok(());
        }
        sqlx::query("INSERT OR IGNORE INTO Links (url) VALUES (?)")
            .bind(url)
            .execute(&self.pool)
            .await?;
        info!(%url, "recorded link as posted");
        Ok(())
    }
}
