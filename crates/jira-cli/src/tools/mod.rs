//! Tool catalogue.
//!
//! Each tool maps one name to one Jira operation. A tool validates its
//! arguments, calls the client, and shapes the response into a JSON value.
//! Failures never escape a tool: they become `{"error": "..."}` payloads.

mod attachments;
mod comments;
mod issues;
mod links;
mod metadata;

use jira::JiraClient;
use serde_json::Value;
use tracing::debug;

use crate::args::Arguments;
use crate::error::ToolError;

/// Every operation the CLI can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    CreateJiraIssue,
    GetIssue,
    UpdateIssue,
    DeleteIssue,
    SearchIssues,
    AddComment,
    CreateIssueLink,
    GetUser,
    ListFields,
    ListIssueTypes,
    ListLinkTypes,
    AttachFile,
    AttachContent,
    GetIssueAttachment,
    AddCommentWithAttachment,
}

impl Tool {
    /// All tools, in the order `list` shows them.
    pub const ALL: [Tool; 15] = [
        Tool::CreateJiraIssue,
        Tool::GetIssue,
        Tool::UpdateIssue,
        Tool::DeleteIssue,
        Tool::SearchIssues,
        Tool::AddComment,
        Tool::CreateIssueLink,
        Tool::GetUser,
        Tool::ListFields,
        Tool::ListIssueTypes,
        Tool::ListLinkTypes,
        Tool::AttachFile,
        Tool::AttachContent,
        Tool::GetIssueAttachment,
        Tool::AddCommentWithAttachment,
    ];

    /// Name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateJiraIssue => "create_jira_issue",
            Self::GetIssue => "get_issue",
            Self::UpdateIssue => "update_issue",
            Self::DeleteIssue => "delete_issue",
            Self::SearchIssues => "search_issues",
            Self::AddComment => "add_comment",
            Self::CreateIssueLink => "create_issue_link",
            Self::GetUser => "get_user",
            Self::ListFields => "list_fields",
            Self::ListIssueTypes => "list_issue_types",
            Self::ListLinkTypes => "list_link_types",
            Self::AttachFile => "attach_file",
            Self::AttachContent => "attach_content",
            Self::GetIssueAttachment => "get_issue_attachment",
            Self::AddCommentWithAttachment => "add_comment_with_attachment",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CreateJiraIssue => "Create a new Jira issue",
            Self::GetIssue => "Get complete issue details including comments and attachments",
            Self::UpdateIssue => "Update an existing Jira issue",
            Self::DeleteIssue => "Delete a Jira issue",
            Self::SearchIssues => "Search for issues in a project using JQL",
            Self::AddComment => "Add a comment to an issue",
            Self::CreateIssueLink => "Create a link between two issues",
            Self::GetUser => "Get user information by email",
            Self::ListFields => "List all available fields",
            Self::ListIssueTypes => "List all issue types",
            Self::ListLinkTypes => "List all issue link types",
            Self::AttachFile => "Attach a local file to an issue",
            Self::AttachContent => "Attach text content as a file to an issue",
            Self::GetIssueAttachment => "Download an attachment, to a file or as base64",
            Self::AddCommentWithAttachment => "Add a comment and attach a local file",
        }
    }

    /// Arguments that must be present and non-empty.
    #[must_use]
    pub const fn required(self) -> &'static [&'static str] {
        match self {
            Self::CreateJiraIssue => &issues::CREATE_REQUIRED,
            Self::GetIssue | Self::UpdateIssue | Self::DeleteIssue => &issues::ISSUE_KEY_REQUIRED,
            Self::SearchIssues => &issues::SEARCH_REQUIRED,
            Self::AddComment => &comments::COMMENT_REQUIRED,
            Self::CreateIssueLink => &links::LINK_REQUIRED,
            Self::GetUser => &metadata::USER_REQUIRED,
            Self::ListFields | Self::ListIssueTypes | Self::ListLinkTypes => &[],
            Self::AttachFile => &attachments::ATTACH_FILE_REQUIRED,
            Self::AttachContent => &attachments::ATTACH_CONTENT_REQUIRED,
            Self::GetIssueAttachment => &attachments::GET_ATTACHMENT_REQUIRED,
            Self::AddCommentWithAttachment => &comments::COMMENT_WITH_ATTACHMENT_REQUIRED,
        }
    }

    /// Look up a tool by its command-line name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Run the tool, returning its result or `{"error": "..."}` payload.
    pub async fn run(self, client: &JiraClient, args: &Arguments<'_>) -> Value {
        match self.execute(client, args).await {
            Ok(result) => result,
            Err(err) => {
                debug!(tool = self.name(), error = %err, "Tool returned an error payload");
                err.to_payload()
            }
        }
    }

    async fn execute(self, client: &JiraClient, args: &Arguments<'_>) -> Result<Value, ToolError> {
        match self {
            Self::CreateJiraIssue => issues::create_jira_issue(client, args).await,
            Self::GetIssue => issues::get_issue(client, args).await,
            Self::UpdateIssue => issues::update_issue(client, args).await,
            Self::DeleteIssue => issues::delete_issue(client, args).await,
            Self::SearchIssues => issues::search_issues(client, args).await,
            Self::AddComment => comments::add_comment(client, args).await,
            Self::CreateIssueLink => links::create_issue_link(client, args).await,
            Self::GetUser => metadata::get_user(client, args).await,
            Self::ListFields => metadata::list_fields(client).await,
            Self::ListIssueTypes => metadata::list_issue_types(client).await,
            Self::ListLinkTypes => links::list_link_types(client).await,
            Self::AttachFile => attachments::attach_file(client, args).await,
            Self::AttachContent => attachments::attach_content(client, args).await,
            Self::GetIssueAttachment => attachments::get_issue_attachment(client, args).await,
            Self::AddCommentWithAttachment => {
                comments::add_comment_with_attachment(client, args).await
            }
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
