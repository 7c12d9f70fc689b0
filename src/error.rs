//! Error types for outbound calls and configuration loading.
//!
//! No [`CallError`] ever escapes a pipeline stage: each stage branches on it
//! and degrades to a usable value. [`ConfigError`] is raised before the first
//! network call and is the one error that stops a run early.

use thiserror::Error;

/// Why a single outbound HTTP call did not yield a usable payload.
#[derive(Debug, Error)]
pub enum CallError {
    /// Connection failure, timeout, non-2xx status or body read failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not JSON, or not the JSON shape we expect.
    #[error("unexpected response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// The completion response parsed but held no `choices[0].message.content`.
    #[error("completion response contained no choices")]
    EmptyCompletion,

    /// No bearer token is configured, so the completion call is not attempted.
    #[error("model API key is not configured")]
    MissingApiKey,
}

/// Problems building the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid {field} URL {value:?}: {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}
