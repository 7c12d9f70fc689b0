//! Briefing generation.
//!
//! Turns the fetched news into a prompt, asks the completion endpoint for a
//! short markdown briefing and, when that fails for any reason, builds a
//! template briefing locally instead. [`generate_briefing`] therefore always
//! returns displayable text.
//!
//! Every fallback contains [`FALLBACK_MARKER`] so a reader of the saved file
//! can tell the model call did not succeed.

use crate::api;
use crate::config::Config;
use crate::models::{Briefing, BriefingOrigin, MAX_NEWS_ITEMS, NewsItem};
use crate::utils::short_cn_stamp;
use chrono::Local;
use reqwest::Client;
use tracing::{info, instrument, warn};

/// Placeholder list used when no news was fetched.
pub const NO_NEWS_PLACEHOLDER: &str = "今日暂无重大新闻";
/// Substring present in every fallback briefing.
pub const FALLBACK_MARKER: &str = "备用简报";

/// Numbered list of up to five titles, one per line, or the placeholder.
pub fn format_news_list(news: &[NewsItem]) -> String {
    if news.is_empty() {
        return NO_NEWS_PLACEHOLDER.to_string();
    }
    news.iter()
        .take(MAX_NEWS_ITEMS)
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.title))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Analyst prompt asking for rated headlines, a price-impact view and risks.
pub fn build_prompt(config: &Config, news_list: &str) -> String {
    format!(
        "你是专业财经分析师，请根据{name}({code})的以下信息生成简报：\n\
         \n\
         【最新动态】：\n\
         {news_list}\n\
         \n\
         请生成简洁的简报，包含：\n\
         1. 重点新闻（带利好/利空/中性判断）\n\
         2. 股价影响评估（短期/中期）\n\
         3. 风险提示\n\
         \n\
         格式用Markdown，总字数300字以内。",
        name = config.stock_name,
        code = config.stock_code,
    )
}

/// Template briefing used when the model call fails.
pub fn fallback_briefing(config: &Config, news_list: &str, stamp: &str) -> String {
    format!(
        "## 📊 {name}简报（备用）\n\
         \n\
         **时间**：{stamp}\n\
         \n\
         **最新动态**：\n\
         {news_list}\n\
         \n\
         **简要分析**：今日需关注主力资金流向和板块轮动情况。\n\
         \n\
         ⚠️ 注：Kimi API调用失败，以上为{FALLBACK_MARKER}。",
        name = config.stock_name,
    )
}

/// Produce this run's briefing. Never fails.
#[instrument(level = "info", skip_all, fields(news = news.len()))]
pub async fn generate_briefing(client: &Client, config: &Config, news: &[NewsItem]) -> Briefing {
    let news_list = format_news_list(news);
    let prompt = build_prompt(config, &news_list);

    info!("Requesting briefing from completion API");
    match api::ask(client, config, &prompt).await {
        Ok(text) => Briefing {
            text,
            origin: BriefingOrigin::Model,
        },
        Err(e) => {
            warn!(error = %e, "Completion failed; using fallback briefing");
            Briefing {
                text: fallback_briefing(config, &news_list, &short_cn_stamp(&Local::now())),
                origin: BriefingOrigin::Fallback,
            }
        }
    }
}
