//! Connection settings for a Jira instance.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable holding the Jira host (e.g. `your-domain.atlassian.net`).
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";
/// Environment variable holding the account email used for basic auth.
pub const ENV_JIRA_EMAIL: &str = "JIRA_EMAIL";
/// Environment variable holding the Jira API token.
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Jira connection configuration.
#[derive(Clone)]
pub struct JiraConfig {
    /// Base URL of the instance, without a trailing slash.
    pub base_url: String,
    /// Account email for basic auth.
    pub email: String,
    /// API token for basic auth.
    pub api_token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl JiraConfig {
    /// Build a configuration from explicit values.
    ///
    /// Absent or blank values are rejected with
    /// [`ConfigError::MissingCredentials`].
    pub fn resolve(
        host: Option<&str>,
        email: Option<&str>,
        api_token: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let (Some(host), Some(email), Some(api_token)) =
            (non_blank(host), non_blank(email), non_blank(api_token))
        else {
            return Err(ConfigError::MissingCredentials);
        };

        Ok(Self {
            base_url: normalize_base_url(host),
            email: email.to_string(),
            api_token: api_token.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Build a configuration from `JIRA_HOST`, `JIRA_EMAIL` and `JIRA_API_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var(ENV_JIRA_HOST).ok();
        let email = env::var(ENV_JIRA_EMAIL).ok();
        let token = env::var(ENV_JIRA_API_TOKEN).ok();
        Self::resolve(host.as_deref(), email.as_deref(), token.as_deref())
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Turn a bare host into an `https://` URL. Values that already carry a
/// scheme are kept as-is.
fn normalize_base_url(host: &str) -> String {
    let url = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };
    url.trim_end_matches('/').to_string()
}
