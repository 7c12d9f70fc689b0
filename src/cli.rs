//! Command-line interface definitions for the stock briefing bot.
//!
//! Every option can be given as a flag; the two secrets are normally
//! supplied through the environment (`KIMI_API_KEY`, `DINGTALK_WEBHOOK`).
//! Values given here override the optional YAML file passed with `--config`.

use clap::Parser;

/// Command-line arguments for a single briefing run.
///
/// # Examples
///
/// ```sh
/// # Defaults: 世纪华通 (002602), file written to the working directory
/// KIMI_API_KEY=sk-... stock_briefing
///
/// # Another stock, pushed to DingTalk, saved under ./briefings
/// stock_briefing --stock-code 600519 --stock-name 贵州茅台 \
///     --output-dir ./briefings --webhook "https://oapi.dingtalk.com/robot/send?access_token=..."
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Stock code embedded in the prompt (e.g. 002602)
    #[arg(long)]
    pub stock_code: Option<String>,

    /// Stock display name, also used as the news search term
    #[arg(long)]
    pub stock_name: Option<String>,

    /// Directory the briefing file is written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Bearer token for the chat-completion endpoint
    #[arg(long, env = "KIMI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// DingTalk robot webhook URL; push is skipped when unset
    #[arg(long, env = "DINGTALK_WEBHOOK", hide_env_values = true)]
    pub webhook: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_are_empty() {
        let cli = Cli::parse_from(["stock_briefing"]);

        assert!(cli.config.is_none());
        assert!(cli.stock_code.is_none());
        assert!(cli.output_dir.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "stock_briefing",
            "-c",
            "briefing.yaml",
            "--stock-code",
            "600519",
            "--stock-name",
            "贵州茅台",
            "-o",
            "/tmp/briefings",
            "--api-key",
            "sk-test",
            "--webhook",
            "https://oapi.dingtalk.com/robot/send?access_token=abc",
        ]);

        assert_eq!(cli.config.as_deref(), Some("briefing.yaml"));
        assert_eq!(cli.stock_code.as_deref(), Some("600519"));
        assert_eq!(cli.stock_name.as_deref(), Some("贵州茅台"));
        assert_eq!(cli.output_dir.as_deref(), Some("/tmp/briefings"));
        assert_eq!(cli.api_key.as_deref(), Some("sk-test"));
        assert_eq!(
            cli.webhook.as_deref(),
            Some("https://oapi.dingtalk.com/robot/send?access_token=abc")
        );
    }
}
