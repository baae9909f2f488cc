//! # Cloaked Chatter
//!
//! A bot that posts the hottest unposted tech news item to a subreddit.
//! Each invocation scrapes the Tech Heat aggregator at a configured
//! freshness tier, drops denied sites and boilerplate titles, skips links it
//! has posted before, and submits the first remaining candidate. One link
//! per run; an external scheduler provides the cadence.
//!
//! ## Architecture
//!
//! - [`scrapers`]: fetches raw candidates from the aggregator
//! - [`filter`]: pure validity rules over site and title
//! - [`history`]: durable SQLite set of already-posted URLs
//! - [`reddit`]: authenticated submission, outcomes normalized
//! - [`pipeline`]: fetch → filter → dedup-check → publish-first-success

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod history;
pub mod models;
pub mod pipeline;
pub mod reddit;
pub mod scrapers;
