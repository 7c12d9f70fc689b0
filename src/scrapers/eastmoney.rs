//! Eastmoney search-suggestion feed.
//!
//! Queries the suggest endpoint with the configured stock name and turns the
//! first five `QuotationCodeTable.Data` records into [`NewsItem`]s.
//!
//! # Request
//!
//! `GET {news_url}?input={stock_name}&type=14&count=10`, bounded by the
//! configured news timeout (10 s by default).

use crate::config::Config;
use crate::error::CallError;
use crate::models::{MAX_NEWS_ITEMS, NewsItem, SuggestResponse};
use crate::utils::truncate_for_log;
use reqwest::Client;
use tracing::{debug, error, info, instrument};

/// Result-type filter understood by the suggest endpoint.
const SUGGEST_TYPE: &str = "14";
/// Candidates requested; only the first [`MAX_NEWS_ITEMS`] are kept.
const SUGGEST_COUNT: &str = "10";

/// Fetch up to five news items for the configured stock.
///
/// Never fails: any network or decoding error is logged and an empty list
/// is returned.
#[instrument(level = "info", skip_all, fields(stock = %config.stock_name))]
pub async fn fetch_news(client: &Client, config: &Config) -> Vec<NewsItem> {
    match try_fetch_news(client, config).await {
        Ok(items) => {
            info!(count = items.len(), "Fetched Eastmoney news");
            items
        }
        Err(e) => {
            error!(error = %e, "Eastmoney fetch failed; continuing with no news");
            Vec::new()
        }
    }
}

async fn try_fetch_news(client: &Client, config: &Config) -> Result<Vec<NewsItem>, CallError> {
    let body = client
        .get(&config.news_url)
        .query(&[
            ("input", config.stock_name.as_str()),
            ("type", SUGGEST_TYPE),
            ("count", SUGGEST_COUNT),
        ])
        .timeout(config.news_timeout)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    debug!(body = %truncate_for_log(&body, 300), "Eastmoney response");

    parse_suggest_body(&body)
}

/// Decode a suggest response body into at most [`MAX_NEWS_ITEMS`] items.
pub fn parse_suggest_body(body: &str) -> Result<Vec<NewsItem>, CallError> {
    let resp: SuggestResponse = serde_json::from_str(body)?;
    Ok(resp
        .QuotationCodeTable
        .Data
        .into_iter()
        .take(MAX_NEWS_ITEMS)
        .map(NewsItem::from)
        .collect())
}
