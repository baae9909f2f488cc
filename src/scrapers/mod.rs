//! Candidate fetching from the news aggregation site.
//!
//! The fetcher is the only place that knows about the aggregator's markup.
//! Its fragility (positional structure of sibling nodes on the page) is
//! contained behind [`FetchNews`]; the pipeline only ever sees typed
//! [`Candidate`](crate::models::Candidate) records.
//!
//! The fetcher does **not** filter: validity rules live in
//! [`crate::filter`] and are applied by the pipeline.

use async_trait::async_trait;

use crate::error::BotError;
use crate::models::{Candidate, FreshnessLevel};

pub mod techheat;

/// Seam between the pipeline and the aggregation site.
///
/// Returns candidates in page order; the order defines priority, and the
/// first acceptable candidate wins.
#[async_trait]
pub trait FetchNews {
    async fn fetch(&self, level: FreshnessLevel) -> Result<Vec<Candidate>, BotError>;
}
