//! Data models for the news feed, the chat-completion API, the DingTalk
//! webhook and the briefing itself.
//!
//! Wire types mirror the JSON they travel as, hence the PascalCase fields
//! on the Eastmoney response and the `#[allow(non_snake_case)]` attributes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound on news items handed to the generator.
pub const MAX_NEWS_ITEMS: usize = 5;

/// One entry returned by the news source.
///
/// `content` holds the record's `Code` field (a security code), not article
/// text. The name is kept as the prompt and fallback only ever read `title`;
/// rename it if article bodies are ever fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub title: String,
    pub content: String,
}

/// Which path produced a [`Briefing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BriefingOrigin {
    /// Text returned verbatim by the completion endpoint.
    Model,
    /// Template text built locally after the completion call failed.
    Fallback,
}

/// The single markdown document produced per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Briefing {
    pub text: String,
    pub origin: BriefingOrigin,
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub news_count: usize,
    pub origin: BriefingOrigin,
    /// `None` when no webhook is configured and the push was skipped.
    pub notified: Option<bool>,
    pub path: PathBuf,
}

// ---- Eastmoney search-suggestion response ----

/// Body of the search-suggestion endpoint. Missing or `null` levels decode
/// to empty defaults so they yield zero items instead of an error.
#[allow(non_snake_case)]
#[derive(Debug, Default, Deserialize)]
pub struct SuggestResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub QuotationCodeTable: QuotationCodeTable,
}

#[allow(non_snake_case)]
#[derive(Debug, Default, Deserialize)]
pub struct QuotationCodeTable {
    #[serde(default, deserialize_with = "null_as_default")]
    pub Data: Vec<SuggestRecord>,
}

/// A candidate record. Absent `Name`/`Code` default to the empty string.
#[allow(non_snake_case)]
#[derive(Debug, Default, Deserialize)]
pub struct SuggestRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub Name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub Code: String,
}

impl From<SuggestRecord> for NewsItem {
    fn from(record: SuggestRecord) -> Self {
        NewsItem {
            title: record.Name,
            content: record.Code,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---- OpenAI-compatible chat completion ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

// ---- DingTalk robot message ----

#[derive(Debug, Serialize)]
pub struct DingTalkMessage {
    pub msgtype: &'static str,
    pub markdown: DingTalkMarkdown,
}

#[derive(Debug, Serialize)]
pub struct DingTalkMarkdown {
    pub title: String,
    pub text: String,
}

impl DingTalkMessage {
    pub fn markdown(title: String, text: String) -> Self {
        Self {
            msgtype: "markdown",
            markdown: DingTalkMarkdown { title, text },
        }
    }
}
