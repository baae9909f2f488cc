//! Selection pipeline: fetch, filter, dedup-check, publish the first winner.
//!
//! One candidate at most is published per run; the program is meant to be
//! re-invoked periodically by an external scheduler, not to loop.
//!
//! # Ordering guarantee
//!
//! A candidate's URL is recorded as posted **before** the publish attempt
//! completes. A crash between marking and a confirmed publish leaves a link
//! recorded but never actually posted; that rare missed post is the price of
//! never double-posting (at-most-once).

use tracing::{info, instrument, warn};

use crate::error::BotError;
use crate::filter::ValidityFilter;
use crate::history::LinkHistory;
use crate::models::{FreshnessLevel, RunResult, SkipReason, Skipped};
use crate::reddit::{PublishLink, PublishOutcome};
use crate::scrapers::FetchNews;

/// Orchestrates one bot run. All collaborators are injected and borrowed;
/// the pipeline holds no state of its own.
pub struct Pipeline<'a, F, P> {
    fetcher: &'a F,
    publisher: &'a P,
    history: &'a LinkHistory,
    filter: &'a ValidityFilter,
}

impl<'a, F, P> Pipeline<'a, F, P>
where
    F: FetchNews,
    P: PublishLink,
{
    pub fn new(
        fetcher: &'a F,
        publisher: &'a P,
        history: &'a LinkHistory,
        filter: &'a ValidityFilter,
    ) -> Self {
        Pipeline {
            fetcher,
            publisher,
            history,
            filter,
        }
    }

    /// Execute one run at the given freshness tier.
    ///
    /// Fetch and storage failures are fatal and surface as `Err`. A publish
    /// failure aborts the iteration but is reported inside the
    /// [`RunResult`] so the caller still sees what was skipped before it.
    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, level: FreshnessLevel) -> Result<RunResult, BotError> {
        let candidates = self.fetcher.fetch(level).await?;
        info!(count = candidates.len(), %level, "fetched candidates");

        let mut result = RunResult::default();
        for candidate in candidates {
            if !self.filter.is_valid(&candidate) {
                result.skipped.push(Skipped {
                    candidate,
                    reason: SkipReason::Invalid,
                });
                continue;
            }
            if self.history.has_been_posted(&candidate.url).await? {
                info!(url = %candidate.url, "already posted, skipping");
                result.skipped.push(Skipped {
                    candidate,
                    reason: SkipReason::AlreadyPosted,
                });
                continue;
            }

            // Mark before publishing: at-most-once beats at-least-once here.
            self.history.record_posted(&candidate.url).await?;

            match self.publisher.publish(&candidate.url, &candidate.title).await {
                PublishOutcome::Success => {
                    info!(url = %candidate.url, title = %candidate.title, "published");
                    result.published = Some(candidate);
                    break;
                }
                PublishOutcome::AlreadyDuplicate => {
                    result.skipped.push(Skipped {
                        candidate,
                        reason: SkipReason::DuplicateUpstream,
                    });
                    continue;
                }
                PublishOutcome::Failure(detail) => {
                    warn!(url = %candidate.url, %detail, "publish failed, aborting run");
                    result.error = Some(BotError::Publish(detail));
                    break;
                }
            }
        }

        if result.published.is_none() && result.error.is_none() {
            info!(skipped = result.skipped.len(), "nothing new to post");
        }
        Ok(result)
    }
}
