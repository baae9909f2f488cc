//! Binary entry point.
//!
//! Wires the collaborators together and executes exactly one pipeline run:
//! tracing init → CLI → config → Reddit login → link history → fetch/filter/
//! publish. A fatal error exits non-zero so the external scheduler can see
//! the failed cycle; nothing is retried in-process.

use std::error::Error;
use std::path::Path;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use cloaked_chatter::cli::Cli;
use cloaked_chatter::config::load_config;
use cloaked_chatter::filter::ValidityFilter;
use cloaked_chatter::history::LinkHistory;
use cloaked_chatter::models::{ExecutionMode, FreshnessLevel};
use cloaked_chatter::pipeline::Pipeline;
use cloaked_chatter::reddit::RedditClient;
use cloaked_chatter::scrapers::techheat::TechHeatFetcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("cloaked_chatter starting up");

    let args = Cli::parse();
    debug!(?args, "parsed CLI arguments");

    let mut config = load_config(Path::new(&args.config)).inspect_err(|e| {
        error!(path = %args.config, error = %e, "failed to load configuration");
    })?;

    // CLI overrides win over the config file.
    if args.dry_run {
        config.bot.dry_run = true;
    }
    if let Some(level) = args.level {
        config.bot.level = level;
    }
    if let Some(database) = args.database {
        config.bot.database = database;
    }

    let mode = if config.bot.dry_run {
        info!("running in dry run mode, nothing will be committed");
        ExecutionMode::DryRun
    } else {
        ExecutionMode::Commit
    };
    let level = FreshnessLevel::try_from(config.bot.level)?;

    let validity = ValidityFilter::new(&config.filter)?;
    let publisher = RedditClient::login(&config.reddit, mode)
        .await
        .inspect_err(|e| error!(error = %e, "reddit login failed"))?;
    let history = LinkHistory::open(Path::new(&config.bot.database), mode)
        .await
        .inspect_err(|e| {
            error!(path = %config.bot.database, error = %e, "cannot open link history");
        })?;
    let http = reqwest::Client::builder()
        .user_agent(&config.reddit.user_agent)
        .build()?;
    let fetcher = TechHeatFetcher::new(http);

    let pipeline = Pipeline::new(&fetcher, &publisher, &history, &validity);
    let result = pipeline.run(level).await.inspect_err(|e| {
        error!(error = %e, "run aborted");
    })?;

    info!(
        published = result.published.is_some(),
        skipped = result.skipped.len(),
        "program done"
    );
    if let Some(e) = result.error {
        error!(error = %e, "run finished with a fatal publish failure");
        return Err(Box::new(e) as Box<dyn Error>);
    }
    Ok(())
}
