//! Chat-completion API interaction.
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint (Moonshot
//! Kimi by default). Exactly one request is made per call; there is no
//! retry. Callers decide what to do with a [`CallError`].
//!
//! # Request
//!
//! ```text
//! POST {completion_url}
//! Authorization: Bearer {api_key}
//! {"model": ..., "messages": [{"role": "system", ...}, {"role": "user", ...}], "temperature": 0.7}
//! ```

use crate::config::Config;
use crate::error::CallError;
use crate::models::{ChatMessage, ChatRequest, ChatResponse};
use crate::utils::truncate_for_log;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Send `prompt` as the user message and return the first choice's content.
///
/// The system message is the configured analyst persona. The returned text
/// is not validated or trimmed.
///
/// # Errors
///
/// - [`CallError::MissingApiKey`] if no key is configured (no request is sent)
/// - [`CallError::Network`] on connect failure, timeout or a non-2xx status
/// - [`CallError::Parse`] if the body is not a chat-completion response
/// - [`CallError::EmptyCompletion`] if `choices` is empty
#[instrument(level = "info", skip_all, fields(model = %config.model))]
pub async fn ask(client: &Client, config: &Config, prompt: &str) -> Result<String, CallError> {
    let api_key = config.api_key.as_deref().ok_or(CallError::MissingApiKey)?;

    let request = ChatRequest {
        model: &config.model,
        messages: vec![
            ChatMessage::system(config.system_prompt.as_str()),
            ChatMessage::user(prompt),
        ],
        temperature: config.temperature,
    };

    let t0 = Instant::now();
    let res = send(client, config, api_key, &request).await;
    let dt = t0.elapsed();

    match &res {
        Ok(content) => info!(
            elapsed_ms = dt.as_millis() as u64,
            chars = content.chars().count(),
            "Completion succeeded"
        ),
        Err(e) => warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "Completion failed"),
    }
    res
}

async fn send(
    client: &Client,
    config: &Config,
    api_key: &str,
    request: &ChatRequest<'_>,
) -> Result<String, CallError> {
    let body = client
        .post(&config.completion_url)
        .bearer_auth(api_key)
        .json(request)
        .timeout(config.completion_timeout)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    debug!(body = %truncate_for_log(&body, 300), "Completion response");

    first_choice(&body)
}

/// Extract `choices[0].message.content` from a completion response body.
pub fn first_choice(body: &str) -> Result<String, CallError> {
    let resp: ChatResponse = serde_json::from_str(body)?;
    resp.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(CallError::EmptyCompletion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config_for(server: &MockServer, api_key: Option<&str>) -> Config {
        Config {
            completion_url: server.url("/v1/chat/completions"),
            api_key: api_key.map(str::to_string),
            ..Config::default()
        }
    }

    #[test]
    fn test_first_choice() {
        let body = json!({
            "id": "cmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "## 简报"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        })
        .to_string();
        assert_eq!(first_choice(&body).unwrap(), "## 简报");
    }

    #[test]
    fn test_first_choice_empty() {
        let body = json!({"choices": []}).to_string();
        assert!(matches!(first_choice(&body), Err(CallError::EmptyCompletion)));
        assert!(matches!(first_choice("{}"), Err(CallError::EmptyCompletion)));
    }

    #[test]
    fn test_first_choice_error_body() {
        let body = json!({"error": {"message": "invalid key"}}).to_string();
        assert!(matches!(first_choice(&body), Err(CallError::EmptyCompletion)));
        assert!(matches!(first_choice("upstream timeout"), Err(CallError::Parse(_))));
    }

    #[tokio::test]
    async fn test_ask_sends_auth_and_messages() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer sk-test")
                    .json_body(json!({
                        "model": "moonshot-v1-8k",
                        "messages": [
                            {"role": "system", "content": "你是专业股票分析师"},
                            {"role": "user", "content": "分析一下"}
                        ],
                        "temperature": 0.7
                    }));
                then.status(200).json_body(json!({
                    "choices": [{"message": {"role": "assistant", "content": "利好"}}]
                }));
            })
            .await;

        let out = ask(&Client::new(), &config_for(&server, Some("sk-test")), "分析一下")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(out, "利好");
    }

    #[tokio::test]
    async fn test_ask_non_2xx_is_network_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(401).json_body(json!({"error": {"message": "bad key"}}));
            })
            .await;

        let err = ask(&Client::new(), &config_for(&server, Some("sk-bad")), "p")
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Network(_)));
    }

    #[tokio::test]
    async fn test_ask_without_key_sends_nothing() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200);
            })
            .await;

        let err = ask(&Client::new(), &config_for(&server, None), "p")
            .await
            .unwrap_err();

        assert!(matches!(err, CallError::MissingApiKey));
        assert_eq!(mock.calls_async().await, 0);
    }
}
