//! Validity filter for scraped candidates.
//!
//! A pure predicate over a candidate's source site and title. The rules are
//! data ([`FilterConfig`]), compiled once into a [`ValidityFilter`] at
//! startup; growing the denylist or the pattern list never touches pipeline
//! logic.

use regex::RegexSet;
use std::collections::HashSet;
use tracing::debug;

use crate::config::FilterConfig;
use crate::error::BotError;
use crate::models::Candidate;

/// Compiled validity rules. See [`FilterConfig`] for the data form.
#[derive(Debug)]
pub struct ValidityFilter {
    denied_sites: HashSet<String>,
    title_patterns: RegexSet,
    missing_title_sentinel: String,
}

impl ValidityFilter {
    /// Compile the configured rules.
    ///
    /// Fails with [`BotError::Config`] when a title pattern is not a valid
    /// regular expression.
    pub fn new(config: &FilterConfig) -> Result<Self, BotError> {
        let title_patterns = RegexSet::new(&config.title_patterns)
            .map_err(|e| BotError::Config(format!("bad title pattern: {e}")))?;
        Ok(ValidityFilter {
            denied_sites: config
                .denied_sites
                .iter()
                .map(|s| s.trim().to_string())
                .collect(),
            title_patterns,
            missing_title_sentinel: config.missing_title_sentinel.clone(),
        })
    }

    /// Whether the candidate is eligible for submission.
    ///
    /// Pure and side-effect free. A candidate is invalid when its source
    /// site is denied, its title matches a boilerplate pattern, its title is
    /// the aggregator's missing-title placeholder, or its title is empty
    /// after trimming.
    pub fn is_valid(&self, candidate: &Candidate) -> bool {
        let title = candidate.title.trim();
        if title.is_empty() {
            debug!(url = %candidate.url, "rejected: empty title");
            return false;
        }
        if title == self.missing_title_sentinel {
            debug!(url = %candidate.url, "rejected: missing-title placeholder");
            return false;
        }
        if self.denied_sites.contains(candidate.site.trim()) {
            debug!(url = %candidate.url, site = %candidate.site, "rejected: denied site");
            return false;
        }
        if self.title_patterns.is_match(title) {
            debug!(url = %candidate.url, title = %title, "rejected: boilerplate title");
            return false;
        }
        true
    }
}
