//! YAML configuration loading.
//!
//! The config file has three sections: `reddit` (credentials and target
//! subreddit), `bot` (runtime knobs), and `filter` (the validity rule data).
//! The `filter` section is optional; its defaults carry the built-in denylist
//! and boilerplate-title patterns so a minimal config still filters.
//!
//! ```yaml
//! reddit:
//!   username: some_bot
//!   password: hunter2
//!   user_agent: "cloaked_chatter/0.2 by some_bot"
//!   subreddit: technology
//! bot:
//!   dry_run: false
//!   level: 3
//!   database: database.sqlite
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::BotError;

/// Credentials and submission target for the publishing platform.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    pub username: String,
    pub password: String,
    pub user_agent: String,
    #[serde(default = "default_subreddit")]
    pub subreddit: String,
}

fn default_subreddit() -> String {
    "technology".to_string()
}

/// Runtime knobs for one bot invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Suppress persistence and actual submissions; log what would happen.
    #[serde(default)]
    pub dry_run: bool,
    /// Freshness tier, 1 (past hour) through 5 (past week).
    #[serde(default = "default_level")]
    pub level: u8,
    /// Path to the SQLite file holding already-posted links.
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_level() -> u8 {
    3
}

fn default_database() -> String {
    "database.sqlite".to_string()
}

/// Data for the validity filter: rules are configuration, not code, so the
/// rule set can grow without touching pipeline logic.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Source sites whose content is never eligible. Matched exactly after
    /// trimming whitespace.
    pub denied_sites: Vec<String>,
    /// Start-anchored regular expressions matching recurring show/column
    /// names and other boilerplate titles.
    pub title_patterns: Vec<String>,
    /// Literal placeholder title the aggregator emits when it has none.
    pub missing_title_sentinel: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            denied_sites: ["Mashable", "Cnet", "Gizmodo"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            title_patterns: [
                r"^The Engadget Show",
                r"^Engadget Podcast \d{2,3}: ",
                r"^Distro Issue \d{2,3}: ",
                r"^This Week On The TechCrunch Gadgets Podcast: ",
                r"^Editor's Letter: ",
                r"^Gillmor Gang ",
                r"^Poll Technica: ",
                r"^The Daily Roundup for",
                r"^Backed Or Whacked: ",
                r"^Ask Engadget: ",
                r"^From idea to science: ",
                r"^CrunchWeek: ",
                r"^The Weekly Good: ",
                r"^Engadget Giveaway: ",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            missing_title_sentinel: "Titel for this article is currently missing".to_string(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub reddit: RedditConfig,
    pub bot: BotConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Load and parse the YAML config file at `path`.
pub fn load_config(path: &Path) -> Result<Config, BotError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| BotError::Config(format!("cannot read {}: {e}", path.display())))?;
    serde_yaml::from_str(&raw)
        .map_err(|e| BotError::Config(format!("cannot parse {}: {e}", path.display())))
}
