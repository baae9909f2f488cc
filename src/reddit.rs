//! Reddit publish adapter.
//!
//! Wraps Reddit's legacy cookie/modhash API: one login call at startup, one
//! submit call per published link. The adapter normalizes every submission
//! outcome into [`PublishOutcome`] so the pipeline can treat an upstream
//! duplicate differently from a real failure.
//!
//! In dry-run mode the login still happens (the read path is exercised and
//! bad credentials fail fast), but no submission is sent.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::config::RedditConfig;
use crate::error::BotError;
use crate::models::ExecutionMode;

const BASE_URL: &str = "https://www.reddit.com";

/// Normalized result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The link was submitted.
    Success,
    /// The platform already has this link; expected steady-state condition.
    AlreadyDuplicate,
    /// Anything else: transport error, auth lapse, API error. Fatal for the
    /// run.
    Failure(String),
}

/// Seam between the pipeline and the publishing platform.
#[async_trait]
pub trait PublishLink {
    async fn publish(&self, url: &str, title: &str) -> PublishOutcome;
}

/// Authenticated Reddit session.
pub struct RedditClient {
    http: Client,
    modhash: String,
    subreddit: String,
    mode: ExecutionMode,
}

impl RedditClient {
    /// Authenticate and build a client.
    ///
    /// Keeps the session cookie in the client's cookie jar and the modhash
    /// for later submissions. Bad credentials or an unreachable API are a
    /// fatal [`BotError::Auth`].
    #[instrument(level = "info", skip_all, fields(username = %config.username))]
    pub async fn login(config: &RedditConfig, mode: ExecutionMode) -> Result<Self, BotError> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .build()
            .map_err(|e| BotError::Auth(e.to_string()))?;

        let response = http
            .post(format!("{BASE_URL}/api/login/{}", config.username))
            .form(&[
                ("user", config.username.as_str()),
                ("passwd", config.password.as_str()),
                ("api_type", "json"),
            ])
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| BotError::Auth(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| BotError::Auth(e.to_string()))?;
        if let Some(errors) = api_errors(&body) {
            return Err(BotError::Auth(errors));
        }
        let modhash = body["json"]["data"]["modhash"]
            .as_str()
            .ok_or_else(|| BotError::Auth("login response carried no modhash".to_string()))?
            .to_string();

        info!("logged in to reddit");
        Ok(RedditClient {
            http,
            modhash,
            subreddit: config.subreddit.clone(),
            mode,
        })
    }

    /// Follow the aggregator's redirect to the article's real URL.
    ///
    /// The aggregator links through its own `/visit/` redirector; Reddit
    /// should receive the destination, not the redirector.
    async fn resolve_redirect(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.http.get(url).send().await?;
        Ok(response.url().to_string())
    }

    async fn submit(&self, url: &str, title: &str) -> Result<Value, reqwest::Error> {
        self.http
            .post(format!("{BASE_URL}/api/submit"))
            .form(&[
                ("uh", self.modhash.as_str()),
                ("kind", "link"),
                ("sr", self.subreddit.as_str()),
                ("title", title),
                ("url", url),
                ("api_type", "json"),
            ])
            .send()
            .await
            .and_then(|resp| resp.error_for_status())?
            .json()
            .await
    }
}

#[async_trait]
impl PublishLink for RedditClient {
    #[instrument(level = "info", skip(self))]
    async fn publish(&self, url: &str, title: &str) -> PublishOutcome {
        let target = match self.resolve_redirect(url).await {
            Ok(target) => target,
            Err(e) => return PublishOutcome::Failure(format!("resolving {url}: {e}")),
        };

        if self.mode.is_dry_run() {
            info!(%target, %title, "dry run: would submit link");
            return PublishOutcome::Success;
        }

        let body = match self.submit(&target, title).await {
            Ok(body) => body,
            Err(e) => return PublishOutcome::Failure(format!("submitting {target}: {e}")),
        };
        match api_errors(&body) {
            None => {
                info!(%target, %title, "successfully posted link");
                PublishOutcome::Success
            }
            Some(errors) if errors.contains("ALREADY_SUB") => {
                info!(%target, %title, "already been posted upstream");
                PublishOutcome::AlreadyDuplicate
            }
            Some(errors) => {
                warn!(%target, %title, %errors, "submit rejected");
                PublishOutcome::Failure(errors)
            }
        }
    }
}

/// Flatten the `json.errors` array of an `api_type=json` response, if any.
///
/// Entries look like `["ALREADY_SUB", "that link has already been
/// submitted", "url"]`.
fn api_errors(body: &Value) -> Option<String> {
    let errors = body["json"]["errors"].as_array()?;
    if errors.is_empty() {
        return None;
    }
    let joined = errors
        .iter()
        .map(|entry| {
            entry
                .as_array()
                .map(|parts| {
                    parts
                        .iter()
                        .filter_map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_else(|| entry.to_string())
        })
        .collect::<Vec<_>>()
        .join("; ");
    Some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_errors_none_when_empty() {
        let body = json!({"json": {"errors": [], "data": {"modhash": "abc"}}});
        assert!(api_errors(&body).is_none());
    }

    #[test]
    fn test_api_errors_none_when_absent() {
        assert!(api_errors(&json!({})).is_none());
    }

    #[test]
    fn test_api_errors_flattens_entries() {
        let body = json!({"json": {"errors": [
            ["ALREADY_SUB", "that link has already been submitted", "url"]
        ]}});
        let errors = api_errors(&body).unwrap();
        assert!(errors.contains("ALREADY_SUB"));
        assert!(errors.contains("already been submitted"));
    }

    #[test]
    fn test_api_errors_joins_multiple() {
        let body = json!({"json": {"errors": [
            ["RATELIMIT", "you are doing that too much", "ratelimit"],
            ["BAD_CAPTCHA", "care to try these again?", "captcha"]
        ]}});
        let errors = api_errors(&body).unwrap();
        assert!(errors.contains("RATELIMIT"));
        assert!(errors.contains("BAD_CAPTCHA"));
    }
}
