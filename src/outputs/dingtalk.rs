//! DingTalk robot webhook push.
//!
//! Sends the briefing as a single markdown message. Delivery is best-effort:
//! the response status is not checked and nothing is retried. A push counts
//! as sent once the HTTP exchange completes.

use crate::config::Config;
use crate::models::DingTalkMessage;
use crate::utils::{minute_stamp, truncate_for_log};
use chrono::{DateTime, Local, TimeZone};
use reqwest::Client;
use std::fmt::Display;
use tracing::{error, info, instrument, warn};

/// A destination the finished briefing can be pushed to.
pub trait Notify {
    /// Push `content`; `true` if the request completed, `false` if it could not be sent.
    async fn notify(&self, content: &str) -> bool;
}

/// Message title: `<stock name>新闻简报`.
pub fn message_title(stock_name: &str) -> String {
    format!("{stock_name}新闻简报")
}

/// Footer appended below the briefing in the pushed message.
pub fn footer<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("\n\n---\n🕐 生成时间：{}\n🤖 自动推送", minute_stamp(at))
}

/// Build the markdown envelope: `content` followed by the footer.
pub fn build_message<Tz: TimeZone>(stock_name: &str, content: &str, at: &DateTime<Tz>) -> DingTalkMessage
where
    Tz::Offset: Display,
{
    DingTalkMessage::markdown(message_title(stock_name), format!("{content}{}", footer(at)))
}

/// [`Notify`] implementation posting to the configured DingTalk robot webhook.
#[derive(Debug)]
pub struct DingTalkNotifier<'a> {
    client: &'a Client,
    config: &'a Config,
}

impl<'a> DingTalkNotifier<'a> {
    pub fn new(client: &'a Client, config: &'a Config) -> Self {
        Self { client, config }
    }
}

impl Notify for DingTalkNotifier<'_> {
    #[instrument(level = "info", skip_all)]
    async fn notify(&self, content: &str) -> bool {
        let Some(webhook_url) = self.config.webhook_url.as_deref() else {
            warn!("No DingTalk webhook configured; nothing sent");
            return false;
        };
        let message = build_message(&self.config.stock_name, content, &Local::now());

        let response = match self
            .client
            .post(webhook_url)
            .json(&message)
            .timeout(self.config.webhook_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "DingTalk push failed");
                return false;
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => info!(%status, body = %truncate_for_log(&body, 500), "DingTalk push sent"),
            Err(e) => warn!(%status, error = %e, "DingTalk push sent; response body unreadable"),
        }
        true
    }
}
