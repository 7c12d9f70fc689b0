//! Run configuration.
//!
//! A [`Config`] is resolved once in `main` from three layers, highest
//! precedence first: command-line flags (and their environment fallbacks),
//! an optional YAML file, and the built-in defaults below. The result is
//! passed by reference to every stage and never modified afterwards.

use crate::cli::Cli;
use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const DEFAULT_STOCK_CODE: &str = "002602";
pub const DEFAULT_STOCK_NAME: &str = "世纪华通";
pub const DEFAULT_NEWS_URL: &str = "https://searchapi.eastmoney.com/api/suggest/get";
pub const DEFAULT_COMPLETION_URL: &str = "https://api.moonshot.cn/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "moonshot-v1-8k";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_SYSTEM_PROMPT: &str = "你是专业股票分析师";

const DEFAULT_NEWS_TIMEOUT_SECS: u64 = 10;
const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Fully resolved, read-only settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub stock_code: String,
    /// Display name; also the search term sent to the news endpoint.
    pub stock_name: String,
    pub news_url: String,
    pub news_timeout: Duration,
    pub completion_url: String,
    pub model: String,
    pub temperature: f32,
    pub system_prompt: String,
    pub completion_timeout: Duration,
    /// Required for a model-written briefing; without it the fallback is used.
    pub api_key: Option<String>,
    /// Push is disabled when unset.
    pub webhook_url: Option<String>,
    pub webhook_timeout: Duration,
    pub output_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stock_code: DEFAULT_STOCK_CODE.to_string(),
            stock_name: DEFAULT_STOCK_NAME.to_string(),
            news_url: DEFAULT_NEWS_URL.to_string(),
            news_timeout: Duration::from_secs(DEFAULT_NEWS_TIMEOUT_SECS),
            completion_url: DEFAULT_COMPLETION_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            completion_timeout: Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS),
            api_key: None,
            webhook_url: None,
            webhook_timeout: Duration::from_secs(DEFAULT_WEBHOOK_TIMEOUT_SECS),
            output_dir: ".".to_string(),
        }
    }
}

/// Shape of the optional YAML config file. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub stock: StockSection,
    pub news: NewsSection,
    pub completion: CompletionSection,
    pub webhook: WebhookSection,
    pub output_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StockSection {
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsSection {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompletionSection {
    pub url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub system_prompt: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebhookSection {
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn from_yaml(path: &str, yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })
    }

    #[instrument(level = "info")]
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_string(),
                source,
            })?;
        let file = Self::from_yaml(path, &yaml)?;
        info!(path, "Loaded config file");
        Ok(file)
    }
}

impl Config {
    /// Resolve the run configuration from the CLI, loading `--config` if given.
    pub async fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match cli.config.as_deref() {
            Some(path) => FileConfig::load(path).await?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    /// Layer CLI over file over defaults, then validate the endpoint URLs.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let secs = Duration::from_secs;

        let config = Config {
            stock_code: cli
                .stock_code
                .clone()
                .or(file.stock.code)
                .unwrap_or(defaults.stock_code),
            stock_name: cli
                .stock_name
                .clone()
                .or(file.stock.name)
                .unwrap_or(defaults.stock_name),
            news_url: file.news.url.unwrap_or(defaults.news_url),
            news_timeout: file.news.timeout_secs.map(secs).unwrap_or(defaults.news_timeout),
            completion_url: file.completion.url.unwrap_or(defaults.completion_url),
            model: file.completion.model.unwrap_or(defaults.model),
            temperature: file.completion.temperature.unwrap_or(defaults.temperature),
            system_prompt: file
                .completion
                .system_prompt
                .unwrap_or(defaults.system_prompt),
            completion_timeout: file
                .completion
                .timeout_secs
                .map(secs)
                .unwrap_or(defaults.completion_timeout),
            api_key: non_blank(cli.api_key.as_deref()),
            webhook_url: non_blank(cli.webhook.as_deref()),
            webhook_timeout: file
                .webhook
                .timeout_secs
                .map(secs)
                .unwrap_or(defaults.webhook_timeout),
            output_dir: cli
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or(defaults.output_dir),
        };

        validate_url("news", &config.news_url)?;
        validate_url("completion", &config.completion_url)?;
        // A bad webhook only costs the push, so it is kept and fails at send time.
        if let Some(webhook) = &config.webhook_url {
            if let Err(e) = validate_url("webhook", webhook) {
                warn!(error = %e, "DingTalk webhook is not a valid URL; push will fail");
            }
        }

        debug!(
            stock_code = %config.stock_code,
            stock_name = %config.stock_name,
            model = %config.model,
            api_key_set = config.api_key.is_some(),
            webhook_set = config.webhook_url.is_some(),
            output_dir = %config.output_dir,
            "Resolved configuration"
        );
        Ok(config)
    }
}

/// Empty or whitespace-only secrets count as unset.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["stock_briefing"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_builtin_defaults() {
        let config = Config::resolve(&cli(&["--api-key", "k"]), FileConfig::default()).unwrap();

        assert_eq!(config.stock_code, "002602");
        assert_eq!(config.stock_name, "世纪华通");
        assert_eq!(config.model, "moonshot-v1-8k");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.news_timeout, Duration::from_secs(10));
        assert_eq!(config.completion_timeout, Duration::from_secs(30));
        assert_eq!(config.webhook_timeout, Duration::from_secs(10));
        assert_eq!(config.output_dir, ".");
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig::from_yaml(
            "test.yaml",
            r#"
stock:
  code: "000001"
  name: 平安银行
completion:
  model: moonshot-v1-32k
  timeout_secs: 60
output_dir: /var/briefings
"#,
        )
        .unwrap();

        let config = Config::resolve(&cli(&["--stock-name", "贵州茅台"]), file).unwrap();

        assert_eq!(config.stock_code, "000001");
        assert_eq!(config.stock_name, "贵州茅台");
        assert_eq!(config.model, "moonshot-v1-32k");
        assert_eq!(config.completion_timeout, Duration::from_secs(60));
        assert_eq!(config.output_dir, "/var/briefings");
    }

    #[test]
    fn test_blank_secrets_are_unset() {
        let config = Config::resolve(
            &cli(&["--api-key", "  ", "--webhook", ""]),
            FileConfig::default(),
        )
        .unwrap();

        assert!(config.api_key.is_none());
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn test_malformed_webhook_is_kept() {
        let config = Config::resolve(
            &cli(&["--webhook", "oapi.dingtalk.com/robot/send?access_token=x"]),
            FileConfig::default(),
        )
        .unwrap();
        assert_eq!(
            config.webhook_url.as_deref(),
            Some("oapi.dingtalk.com/robot/send?access_token=x")
        );
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let file = FileConfig::from_yaml("test.yaml", "news:\n  url: searchapi\n").unwrap();
        let err = Config::resolve(&cli(&[]), file).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { field: "news", .. }));
    }

    #[test]
    fn test_unknown_yaml_key_is_rejected() {
        let err = FileConfig::from_yaml("bad.yaml", "stock:\n  ticker: AAPL\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[tokio::test]
    async fn test_missing_config_file() {
        let err = FileConfig::load("/definitely/not/here.yaml").await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
