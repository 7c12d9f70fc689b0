//! # Stock Briefing
//!
//! A small scheduled bot that writes a daily news briefing for one A-share
//! stock. It pulls the latest items from Eastmoney, asks an
//! OpenAI-compatible chat model (Moonshot Kimi by default) for a short
//! markdown analysis, pushes the result to a DingTalk group and saves it to
//! `briefing_<YYYYMMDD_HHMM>.md`.
//!
//! ## Usage
//!
//! ```sh
//! KIMI_API_KEY=sk-... DINGTALK_WEBHOOK=https://oapi.dingtalk.com/robot/send?access_token=... stock_briefing
//! ```
//!
//! ## Architecture
//!
//! One linear pass, each stage awaited before the next:
//! 1. **Fetching**: Up to 5 items from the Eastmoney suggest API (empty on failure)
//! 2. **Generation**: One chat-completion call; a template briefing on failure
//! 3. **Push**: One DingTalk webhook call, skipped when no webhook is set
//! 4. **Output**: The briefing text written verbatim to the output directory
//!
//! Upstream failures never abort the run; they only show up in the log and,
//! for generation, as a fallback banner in the briefing itself.

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod briefing;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use config::Config;
use outputs::DingTalkNotifier;
use utils::ensure_writable_dir;

#[tokio::main(flavor = "current_thread")]
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

    let start_time = std::time::Instant::now();
    info!(version = env!("CARGO_PKG_VERSION"), "stock_briefing starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.output_dir, "Parsed CLI arguments");

    let config = match Config::from_cli(&args).await {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    // Early check: fail before any network call if the briefing can't be saved
    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(
            path = %config.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let client = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let notifier = DingTalkNotifier::new(&client, &config);

    let report = match pipeline::run(&client, &config, &notifier).await {
        Ok(report) => report,
        Err(e) => {
            error!(path = %config.output_dir, error = %e, "Failed writing briefing");
            return Err(e);
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        news = report.news_count,
        origin = ?report.origin,
        notified = ?report.notified,
        path = %report.path.display(),
        "Execution complete"
    );

    Ok(())
}
