//! Error taxonomy for a single bot run.
//!
//! Every fatal condition aborts the current run; nothing is retried
//! in-process. The external scheduler observes the exit status and retries
//! on its next cycle. The one expected steady-state condition, an upstream
//! duplicate, is not an error at all — it lives in
//! [`PublishOutcome::AlreadyDuplicate`](crate::reddit::PublishOutcome).

use thiserror::Error;

/// Fatal failures surfaced by one run of the bot.
#[derive(Debug, Error)]
pub enum BotError {
    /// Network or parse failure while retrieving candidates.
    #[error("failed to fetch news items: {0}")]
    Fetch(String),

    /// The dedup store is unreachable or rejected a statement.
    #[error("link history unavailable: {0}")]
    Storage(#[from] sqlx::Error),

    /// Generic submission failure; aborts the remaining candidates.
    #[error("failed to publish link: {0}")]
    Publish(String),

    /// Could not authenticate against the publishing platform.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Bad or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
