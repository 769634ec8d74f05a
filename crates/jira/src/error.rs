//! Error types for the Jira client.

use thiserror::Error;

/// Errors raised while talking to Jira.
#[derive(Debug, Error)]
pub enum JiraError {
    /// Transport-level failure (connect, timeout, TLS, body read)
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Jira answered with a non-success status
    #[error("Jira returned HTTP {status} for {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// A URL handed back by Jira could not be parsed
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Response body did not match the expected shape
    #[error("Unexpected response from {url}: {error}")]
    Decode {
        url: String,
        error: serde_json::Error,
    },
}

/// Errors raised while building a [`crate::JiraConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Missing JIRA credentials. Set JIRA_HOST, JIRA_EMAIL, JIRA_API_TOKEN \
         environment variables or pass --jira-host, --jira-email, --jira-token"
    )]
    MissingCredentials,

    #[error("Invalid Jira URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T, E = JiraError> = std::result::Result<T, E>;
