//! End-to-end pipeline scenarios with in-process collaborators.
//!
//! The fetcher and publisher are scripted fakes; the link history is a real
//! in-memory SQLite store, so the dedup behavior under test is the code that
//! runs in production.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use cloaked_chatter::config::FilterConfig;
use cloaked_chatter::error::BotError;
use cloaked_chatter::filter::ValidityFilter;
use cloaked_chatter::history::LinkHistory;
use cloaked_chatter::models::{Candidate, ExecutionMode, FreshnessLevel, SkipReason};
use cloaked_chatter::pipeline::Pipeline;
use cloaked_chatter::reddit::{PublishLink, PublishOutcome};
use cloaked_chatter::scrapers::FetchNews;

struct StubFetcher {
    candidates: Vec<Candidate>,
}

#[async_trait]
impl FetchNews for StubFetcher {
    async fn fetch(&self, _level: FreshnessLevel) -> Result<Vec<Candidate>, BotError> {
        Ok(self.candidates.clone())
    }
}

/// Publisher that replays scripted outcomes and records every call.
struct ScriptedPublisher {
    outcomes: Mutex<VecDeque<PublishOutcome>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedPublisher {
    fn new(outcomes: impl IntoIterator<Item = PublishOutcome>) -> Self {
        ScriptedPublisher {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PublishLink for ScriptedPublisher {
    async fn publish(&self, url: &str, _title: &str) -> PublishOutcome {
        self.calls.lock().unwrap().push(url.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PublishOutcome::Success)
    }
}

fn candidate(url: &str, title: &str, rank: f64) -> Candidate {
    Candidate {
        url: url.to_string(),
        title: title.to_string(),
        site: "Engadget".to_string(),
        rank,
    }
}

fn validity() -> ValidityFilter {
    ValidityFilter::new(&FilterConfig::default()).unwrap()
}

async fn history() -> LinkHistory {
    LinkHistory::open_in_memory(ExecutionMode::Commit)
        .await
        .unwrap()
}

#[tokio::test]
async fn first_valid_candidate_wins_and_stops_the_run() {
    let fetcher = StubFetcher {
        candidates: vec![
            candidate("http://x/1", "Normal Article", 1.0),
            candidate("http://x/2", "The Engadget Show 42", 2.0),
        ],
    };
    let publisher = ScriptedPublisher::new([PublishOutcome::Success]);
    let history = history().await;
    let filter = validity();

    let result = Pipeline::new(&fetcher, &publisher, &history, &filter)
        .run(FreshnessLevel::Hot)
        .await
        .unwrap();

    assert_eq!(result.published.unwrap().url, "http://x/1");
    assert!(result.error.is_none());
    // Candidate 2 is never reached; the run stops at the first success.
    assert_eq!(publisher.calls(), vec!["http://x/1"]);
    assert!(history.has_been_posted("http://x/1").await.unwrap());
    assert!(!history.has_been_posted("http://x/2").await.unwrap());
}

#[tokio::test]
async fn already_posted_link_publishes_nothing() {
    let fetcher = StubFetcher {
        candidates: vec![candidate("http://x/1", "T", 1.0)],
    };
    let publisher = ScriptedPublisher::new([]);
    let history = history().await;
    history.record_posted("http://x/1").await.unwrap();
    let filter = validity();

    let result = Pipeline::new(&fetcher, &publisher, &history, &filter)
        .run(FreshnessLevel::Hot)
        .await
        .unwrap();

    assert!(result.published.is_none());
    assert!(result.error.is_none());
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].reason, SkipReason::AlreadyPosted);
    assert!(publisher.calls().is_empty());
}

#[tokio::test]
async fn upstream_duplicate_marks_and_moves_on() {
    let fetcher = StubFetcher {
        candidates: vec![
            candidate("http://x/1", "Dupe Upstream", 1.0),
            candidate("http://x/2", "Fresh One", 2.0),
        ],
    };
    let publisher =
        ScriptedPublisher::new([PublishOutcome::AlreadyDuplicate, PublishOutcome::Success]);
    let history = history().await;
    let filter = validity();

    let result = Pipeline::new(&fetcher, &publisher, &history, &filter)
        .run(FreshnessLevel::Hot)
        .await
        .unwrap();

    // The duplicate is non-fatal: marked locally, then the next candidate is
    // evaluated.
    assert!(history.has_been_posted("http://x/1").await.unwrap());
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].reason, SkipReason::DuplicateUpstream);
    assert_eq!(result.published.unwrap().url, "http://x/2");
    assert_eq!(publisher.calls(), vec!["http://x/1", "http://x/2"]);
}

#[tokio::test]
async fn publish_failure_aborts_remaining_candidates() {
    let fetcher = StubFetcher {
        candidates: vec![
            candidate("http://x/1", "Will Fail", 1.0),
            candidate("http://x/2", "Never Tried", 2.0),
        ],
    };
    let publisher =
        ScriptedPublisher::new([PublishOutcome::Failure("503 from upstream".to_string())]);
    let history = history().await;
    let filter = validity();

    let result = Pipeline::new(&fetcher, &publisher, &history, &filter)
        .run(FreshnessLevel::Hot)
        .await
        .unwrap();

    assert!(result.published.is_none());
    assert!(matches!(result.error, Some(BotError::Publish(_))));
    assert_eq!(publisher.calls(), vec!["http://x/1"]);
    // The URL stays marked from the pre-publish marking step.
    assert!(history.has_been_posted("http://x/1").await.unwrap());
    assert!(!history.has_been_posted("http://x/2").await.unwrap());
}

#[tokio::test]
async fn denied_site_is_filtered_regardless_of_title() {
    let mut bad = candidate("http://x/1", "A Perfectly Good Title", 9.0);
    bad.site = "Mashable".to_string();
    let fetcher = StubFetcher {
        candidates: vec![bad, candidate("http://x/2", "Runner Up", 1.0)],
    };
    let publisher = ScriptedPublisher::new([PublishOutcome::Success]);
    let history = history().await;
    let filter = validity();

    let result = Pipeline::new(&fetcher, &publisher, &history, &filter)
        .run(FreshnessLevel::Hot)
        .await
        .unwrap();

    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].reason, SkipReason::Invalid);
    assert_eq!(result.published.unwrap().url, "http://x/2");
    assert_eq!(publisher.calls(), vec!["http://x/2"]);
    // Filtered candidates are never marked as posted.
    assert!(!history.has_been_posted("http://x/1").await.unwrap());
}

#[tokio::test]
async fn boilerplate_titles_never_reach_the_publisher() {
    let fetcher = StubFetcher {
        candidates: vec![
            candidate("http://x/1", "Engadget Podcast 311: CES wrapup", 3.0),
            candidate("http://x/2", "Titel for this article is currently missing", 2.0),
            candidate("http://x/3", "", 1.0),
        ],
    };
    let publisher = ScriptedPublisher::new([]);
    let history = history().await;
    let filter = validity();

    let result = Pipeline::new(&fetcher, &publisher, &history, &filter)
        .run(FreshnessLevel::Hot)
        .await
        .unwrap();

    assert!(result.published.is_none());
    assert_eq!(result.skipped.len(), 3);
    assert!(publisher.calls().is_empty());
}

#[tokio::test]
async fn dry_run_history_keeps_reruns_honest() {
    // In dry-run mode the store records nothing, so the same candidate would
    // be picked again on the next invocation.
    let fetcher = StubFetcher {
        candidates: vec![candidate("http://x/1", "Normal Article", 1.0)],
    };
    let publisher = ScriptedPublisher::new([PublishOutcome::Success, PublishOutcome::Success]);
    let history = LinkHistory::open_in_memory(ExecutionMode::DryRun)
        .await
        .unwrap();
    let filter = validity();

    let pipeline = Pipeline::new(&fetcher, &publisher, &history, &filter);
    let first = pipeline.run(FreshnessLevel::Hot).await.unwrap();
    assert_eq!(first.published.unwrap().url, "http://x/1");
    assert!(!history.has_been_posted("http://x/1").await.unwrap());

    let second = pipeline.run(FreshnessLevel::Hot).await.unwrap();
    assert_eq!(second.published.unwrap().url, "http://x/1");
    assert_eq!(publisher.calls().len(), 2);
}
