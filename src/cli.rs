//! Command-line interface definitions.
//!
//! Credentials and filter rules live in the YAML config file; the flags here
//! select the file and override the per-run knobs.

use clap::Parser;

/// Command-line arguments for the bot.
///
/// # Examples
///
/// ```sh
/// # Normal run with the default config location
/// cloaked_chatter
///
/// # Audit what would be posted without touching anything
/// cloaked_chatter --dry-run --level 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, default_value = "configs/bot.yaml")]
    pub config: String,

    /// Override the SQLite database path from the config
    #[arg(short, long)]
    pub database: Option<String>,

    /// Override the freshness level from the config (1 = past hour ... 5 = past week)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub level: Option<u8>,

    /// Run without persisting or submitting anything
    #[arg(long)]
    pub dry_run: bool,
}
