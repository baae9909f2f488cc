//! Tech Heat scraper.
//!
//! Scrapes candidate items from [techhe.at](http://techhe.at), an aggregator
//! that ranks tech stories by a numeric "degree" of heat. Each freshness
//! tier is a path on the site (`/hour`, `/6hours`, the front page, `/3days`,
//! `/week`).
//!
//! # Markup
//!
//! Each story is a `div.item`. The link and title live under
//! `div.item_content h3 a`, the attributed source site under the
//! `div.item_meta` span, and the degree in the entry's `h2` heading as text
//! like `9.4°`. Entries missing any of these are logged and skipped; only a
//! page-level fetch or parse failure is fatal.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::FetchNews;
use crate::error::BotError;
use crate::models::{Candidate, FreshnessLevel};

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([.\d]+)").unwrap());

static ITEM_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("div.item").unwrap());
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.item_content h3 a").unwrap());
static SITE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("div.item_meta span").unwrap());
static DEGREE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());

/// Fetches candidates from Tech Heat.
#[derive(Debug)]
pub struct TechHeatFetcher {
    http: reqwest::Client,
    base_url: Url,
}

impl TechHeatFetcher {
    pub const DEFAULT_BASE_URL: &'static str = "http://techhe.at/";

    /// Create a fetcher for the live site.
    pub fn new(http: reqwest::Client) -> Self {
        // The literal is valid; parse cannot fail.
        let base_url = Url::parse(Self::DEFAULT_BASE_URL).unwrap();
        TechHeatFetcher { http, base_url }
    }

    /// Create a fetcher against a different base URL (tests, mirrors).
    pub fn with_base_url(http: reqwest::Client, base_url: Url) -> Self {
        TechHeatFetcher { http, base_url }
    }

    /// Extract candidates from a listing page.
    ///
    /// Public so the parsing can be exercised against captured markup
    /// without a network round trip.
    pub fn parse_listing(&self, html: &str) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let mut candidates = Vec::new();
        for entry in document.select(&ITEM_SELECTOR) {
            match self.parse_entry(entry) {
                Some(candidate) => candidates.push(candidate),
                None => warn!("skipping malformed item entry"),
            }
        }
        candidates
    }

    fn parse_entry(&self, entry: ElementRef<'_>) -> Option<Candidate> {
        let link = entry.select(&LINK_SELECTOR).next()?;
        let href = link.value().attr("href")?;
        let url = self.base_url.join(href).ok()?;

        let title = link
            .text()
            .collect::<String>()
            .replace('\t', "")
            .trim()
            .to_string();

        let site = entry
            .select(&SITE_SELECTOR)
            .next()?
            .text()
            .collect::<String>()
            .trim()
            .to_string();

        // The degree heading reads like "9.4°"; keep page order on failure.
        let degree_text = entry
            .select(&DEGREE_SELECTOR)
            .next()
            .map(|h| h.text().collect::<String>())
            .unwrap_or_default();
        let rank = DEGREE_RE
            .captures(&degree_text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0);

        debug!(url = %url, %title, %site, rank, "parsed item entry");
        Some(Candidate {
            url: url.to_string(),
            title,
            site,
            rank,
        })
    }
}

#[async_trait::async_trait]
impl FetchNews for TechHeatFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, level: FreshnessLevel) -> Result<Vec<Candidate>, BotError> {
        let page_url = self
            .base_url
            .join(level.path())
            .map_err(|e| BotError::Fetch(e.to_string()))?;
        let html = self
            .http
            .get(page_url.clone())
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| BotError::Fetch(e.to_string()))?
            .text()
            .await
            .map_err(|e| BotError::Fetch(e.to_string()))?;

        let candidates = self.parse_listing(&html);
        info!(count = candidates.len(), url = %page_url, "indexed news items");
        Ok(candidates)
    }
}
