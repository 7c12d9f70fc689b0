//! The briefing run: fetch → generate → push → save.
//!
//! Stages run strictly one after another, each consuming the previous
//! stage's complete output. Fetching, generation and the push always hand
//! back a usable value, so the only branch here is whether a webhook is
//! configured. Saving the file is the one step whose failure is returned.

use crate::briefing::generate_briefing;
use crate::config::Config;
use crate::models::RunReport;
use crate::outputs::Notify;
use crate::outputs::markdown::write_briefing;
use crate::scrapers::eastmoney::fetch_news;
use chrono::Local;
use reqwest::Client;
use std::error::Error;
use tracing::{info, instrument};

#[instrument(level = "info", skip_all, fields(stock = %config.stock_name, code = %config.stock_code))]
pub async fn run<N: Notify>(
    client: &Client,
    config: &Config,
    notifier: &N,
) -> Result<RunReport, Box<dyn Error>> {
    let started = Local::now();
    info!(%started, "=== Starting {} briefing ===", config.stock_name);

    let news = fetch_news(client, config).await;
    info!(count = news.len(), "Fetched news items");

    let briefing = generate_briefing(client, config, &news).await;
    info!(origin = ?briefing.origin, "Generated briefing:\n{}", briefing.text);

    let notified = if config.webhook_url.is_some() {
        Some(notifier.notify(&briefing.text).await)
    } else {
        info!("No DingTalk webhook configured; skipping push");
        None
    };

    let path = write_briefing(&config.output_dir, &briefing.text, &started).await?;
    info!(path = %path.display(), "=== Done ===");

    Ok(RunReport {
        news_count: news.len(),
        origin: briefing.origin,
        notified,
        path,
    })
}
