//! Issue comments.

use jira::JiraClient;
use serde_json::{json, Value};

use super::attachments::read_upload;
use crate::args::Arguments;
use crate::error::{ActionContext, ToolError};

pub(crate) const COMMENT_REQUIRED: [&str; 2] = ["issueKey", "comment"];
pub(crate) const COMMENT_WITH_ATTACHMENT_REQUIRED: [&str; 3] = ["issueKey", "comment", "filePath"];

pub(crate) async fn add_comment(
    client: &JiraClient,
    args: &Arguments<'_>,
) -> Result<Value, ToolError> {
    let [issue_key, comment] = args.require(&COMMENT_REQUIRED)?;

    client
        .add_comment(&issue_key, &comment)
        .await
        .action("add comment")?;

    Ok(json!({
        "key": issue_key,
        "comment_added": true,
    }))
}

/// Comment first, then upload. The file is checked before either call.
pub(crate) async fn add_comment_with_attachment(
    client: &JiraClient,
    args: &Arguments<'_>,
) -> Result<Value, ToolError> {
    const ACTION: &str = "add comment with attachment";
    let [issue_key, comment, file_path] = args.require(&COMMENT_WITH_ATTACHMENT_REQUIRED)?;

    let upload = read_upload(&file_path, ACTION).await?;

    client
        .add_comment(&issue_key, &comment)
        .await
        .action(ACTION)?;
    client
        .add_attachment(&issue_key, &upload.filename, upload.content)
        .await
        .action(ACTION)?;

    Ok(json!({
        "key": issue_key,
        "comment_added": true,
        "attachment_added": true,
        "filename": upload.filename,
    }))
}
