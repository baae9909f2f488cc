//! Core data types shared across the pipeline.
//!
//! This module defines the data structures that flow between the fetcher,
//! the validity filter, the dedup store, and the publish adapter:
//! - [`Candidate`]: a scraped news item eligible for submission
//! - [`FreshnessLevel`]: enumerated tier selecting how recent candidates must be
//! - [`ExecutionMode`]: commit vs. dry-run, decided once at startup
//! - [`RunResult`]: the outcome of a single pipeline invocation

use std::fmt;

use crate::error::BotError;

/// A scraped news item eligible for submission.
///
/// Candidates are fetched fresh each run and discarded afterwards; only the
/// URL of a published (or publish-attempted) candidate is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Absolute URL of the item on the aggregation site. Unique key.
    pub url: String,
    /// Headline text, tab-stripped and trimmed.
    pub title: String,
    /// Name of the source site the aggregator attributes the item to.
    pub site: String,
    /// Numeric heat/freshness score ("degree") from the aggregator.
    pub rank: f64,
}

/// Freshness tier selecting how recent candidates must be.
///
/// Maps the configured level `1..=5` onto the aggregation site's URL path
/// segments, from most-recent to one-week-old.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessLevel {
    PastHour,
    PastSixHours,
    Hot,
    PastThreeDays,
    PastWeek,
}

impl FreshnessLevel {
    /// URL path segment on the aggregation site for this tier.
    ///
    /// [`FreshnessLevel::Hot`] is the site's front page and has no segment.
    pub fn path(self) -> &'static str {
        match self {
            FreshnessLevel::PastHour => "hour",
            FreshnessLevel::PastSixHours => "6hours",
            FreshnessLevel::Hot => "",
            FreshnessLevel::PastThreeDays => "3days",
            FreshnessLevel::PastWeek => "week",
        }
    }
}

impl TryFrom<u8> for FreshnessLevel {
    type Error = BotError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(FreshnessLevel::PastHour),
            2 => Ok(FreshnessLevel::PastSixHours),
            3 => Ok(FreshnessLevel::Hot),
            4 => Ok(FreshnessLevel::PastThreeDays),
            5 => Ok(FreshnessLevel::PastWeek),
            other => Err(BotError::Config(format!("level must be 1-5, got {other}"))),
        }
    }
}

impl fmt::Display for FreshnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FreshnessLevel::PastHour => "past-hour",
            FreshnessLevel::PastSixHours => "past-6-hours",
            FreshnessLevel::Hot => "hot",
            FreshnessLevel::PastThreeDays => "past-3-days",
            FreshnessLevel::PastWeek => "past-week",
        };
        f.write_str(name)
    }
}

/// Commit vs. dry-run, decided once at startup and handed to the store and
/// the publish adapter at construction time.
///
/// In dry-run mode every read path runs as normal, but nothing is persisted
/// and nothing is submitted; the would-be side effects are logged instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Commit,
    DryRun,
}

impl ExecutionMode {
    pub fn is_dry_run(self) -> bool {
        matches!(self, ExecutionMode::DryRun)
    }
}

/// Why a candidate was passed over during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Rejected by the validity filter (denied site or boilerplate title).
    Invalid,
    /// Already present in the local dedup store.
    AlreadyPosted,
    /// The platform itself rejected the submission as a duplicate.
    DuplicateUpstream,
}

/// A candidate that was considered but not published, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub candidate: Candidate,
    pub reason: SkipReason,
}

/// Outcome of one pipeline invocation.
///
/// At most one candidate is ever published per run. A fatal publish failure
/// is carried in `error`; fetch and storage failures abort the run before a
/// `RunResult` is produced at all.
#[derive(Debug, Default)]
pub struct RunResult {
    /// The candidate that was successfully published, if any.
    pub published: Option<Candidate>,
    /// Candidates that were filtered, deduplicated, or duplicated upstream.
    pub skipped: Vec<Skipped>,
    /// Fatal publish failure that aborted the run mid-iteration.
    pub error: Option<BotError>,
}
