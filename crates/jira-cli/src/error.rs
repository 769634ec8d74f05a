//! Per-tool failure type.

use jira::JiraError;
use serde_json::{json, Value};
use thiserror::Error;

/// Why a tool produced an error payload instead of a result.
#[derive(Debug, Error)]
pub enum ToolError {
    /// One or more required arguments were absent or empty
    #[error("{}", missing_message(.0))]
    MissingArguments(&'static [&'static str]),

    /// A required argument had a type that cannot be used as text
    #[error("{key} must be a string")]
    InvalidArgument { key: &'static str },

    /// A lookup found nothing (user, attachment, local file)
    #[error("{0}")]
    NotFound(String),

    /// An attachment exists but Jira gave no URL to fetch it from
    #[error("Attachment {attachment} has no content URL")]
    NoContent { attachment: String },

    /// Jira rejected or failed the request
    #[error("Failed to {action}: {source}")]
    Jira {
        action: &'static str,
        #[source]
        source: JiraError,
    },

    /// Local file could not be read or written
    #[error("Failed to {action}: {source}")]
    Io {
        action: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    /// Render as the `{"error": "..."}` payload tools return.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// "a is required", "a and b are required", "a, b, and c are required".
fn missing_message(keys: &[&str]) -> String {
    match keys {
        [] => "required arguments are missing".to_string(),
        [only] => format!("{only} is required"),
        [first, second] => format!("{first} and {second} are required"),
        [init @ .., last] => format!("{}, and {last} are required", init.join(", ")),
    }
}

/// Attach the operation name to a lower-level failure.
pub(crate) trait ActionContext<T> {
    fn action(self, action: &'static str) -> Result<T, ToolError>;
}

impl<T> ActionContext<T> for Result<T, JiraError> {
    fn action(self, action: &'static str) -> Result<T, ToolError> {
        self.map_err(|source| ToolError::Jira { action, source })
    }
}

impl<T> ActionContext<T> for std::io::Result<T> {
    fn action(self, action: &'static str) -> Result<T, ToolError> {
        self.map_err(|source| ToolError::Io { action, source })
    }
}
