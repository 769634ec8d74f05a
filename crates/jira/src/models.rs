//! Jira REST v2 entity definitions.
//!
//! Only the parts of each payload the CLI reads are modelled. Unknown
//! properties are ignored.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference returned after creating an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRef {
    /// Numeric id, as a string
    pub id: String,
    /// Issue key (e.g. "PROJ-123")
    pub key: String,
    /// REST URL of the issue
    #[serde(rename = "self")]
    pub self_url: String,
}

/// Jira issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

/// Issue fields the CLI renders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: Option<String>,
    /// Plain text in v2; kept as raw JSON so rich-text payloads pass through.
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub status: Option<Named>,
    #[serde(default)]
    pub priority: Option<Named>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub issuetype: Option<Named>,
    #[serde(default)]
    pub comment: Option<CommentPage>,
    #[serde(default)]
    pub attachment: Option<Vec<Attachment>>,
}

impl IssueFields {
    /// Comments, empty when the field was not requested.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        self.comment.as_ref().map_or(&[], |page| page.comments.as_slice())
    }

    /// Attachments, empty when the field was not requested.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        self.attachment.as_deref().unwrap_or_default()
    }
}

/// Any entity that renders as its name (status, priority, issue type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

impl fmt::Display for Named {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Jira user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Hidden by Jira Cloud unless the profile is public
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub active: bool,
    /// Server/Data Center username
    #[serde(default)]
    pub name: Option<String>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self
            .display_name
            .as_deref()
            .or(self.name.as_deref())
            .or(self.account_id.as_deref())
            .unwrap_or_default();
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Issue comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub created: Option<String>,
}

/// Issue attachment metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Absolute download URL
    #[serde(default)]
    pub content: Option<String>,
}

/// Result page of a JQL search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub start_at: u32,
    #[serde(default)]
    pub max_results: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// Field definition (system or custom).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub custom: bool,
}

/// Issue type definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Issue link type, e.g. "Blocks" with phrases "is blocked by" / "blocks".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueLinkType {
    pub id: String,
    pub name: String,
    pub inward: String,
    pub outward: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssueLinkTypeList {
    #[serde(default)]
    pub issue_link_types: Vec<IssueLinkType>,
}

/// Instance details returned by `/serverInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub deployment_type: Option<String>,
    #[serde(default)]
    pub server_title: Option<String>,
}

/// Error body Jira attaches to 4xx/5xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorCollection {
    #[serde(default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, Value>,
}

impl ErrorCollection {
    /// Flatten into one line, `None` when Jira sent nothing useful.
    pub fn summary(&self) -> Option<String> {
        let mut parts: Vec<String> = self.error_messages.clone();
        for (field, value) in &self.errors {
            let text = value
                .as_str()
                .map_or_else(|| value.to_string(), ToString::to_string);
            parts.push(format!("{field}: {text}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}
