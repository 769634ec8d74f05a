//! Attachment upload and download.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jira::JiraClient;
use serde_json::{json, Value};
use tracing::debug;

use crate::args::Arguments;
use crate::error::{ActionContext, ToolError};

pub(crate) const ATTACH_FILE_REQUIRED: [&str; 2] = ["issueKey", "filePath"];
pub(crate) const ATTACH_CONTENT_REQUIRED: [&str; 3] = ["issueKey", "filename", "content"];
pub(crate) const GET_ATTACHMENT_REQUIRED: [&str; 2] = ["issueKey", "attachmentId"];

/// A local file ready to upload under its base name.
pub(crate) struct Upload {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Read `file_path`, reporting a missing file as "File not found: <path>".
pub(crate) async fn read_upload(
    file_path: &str,
    action: &'static str,
) -> Result<Upload, ToolError> {
    let path = Path::new(file_path);
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(ToolError::NotFound(format!("File not found: {file_path}")));
    }

    let content = tokio::fs::read(path).await.action(action)?;
    let filename = path
        .file_name()
        .map_or_else(|| file_path.to_string(), |name| name.to_string_lossy().into_owned());
    debug!(%filename, bytes = content.len(), "Read attachment");

    Ok(Upload { filename, content })
}

pub(crate) async fn attach_file(
    client: &JiraClient,
    args: &Arguments<'_>,
) -> Result<Value, ToolError> {
    const ACTION: &str = "attach file";
    let [issue_key, file_path] = args.require(&ATTACH_FILE_REQUIRED)?;

    let upload = read_upload(&file_path, ACTION).await?;
    client
        .add_attachment(&issue_key, &upload.filename, upload.content)
        .await
        .action(ACTION)?;

    Ok(json!({
        "key": issue_key,
        "filename": upload.filename,
        "attached": true,
    }))
}

pub(crate) async fn attach_content(
    client: &JiraClient,
    args: &Arguments<'_>,
) -> Result<Value, ToolError> {
    let [issue_key, filename, content] = args.require(&ATTACH_CONTENT_REQUIRED)?;

    client
        .add_attachment(&issue_key, &filename, content.into_bytes())
        .await
        .action("attach content")?;

    Ok(json!({
        "key": issue_key,
        "filename": filename,
        "attached": true,
    }))
}

/// Find an attachment by id or filename and return its bytes, either
/// written to `outputPath` or inline as base64.
pub(crate) async fn get_issue_attachment(
    client: &JiraClient,
    args: &Arguments<'_>,
) -> Result<Value, ToolError> {
    const ACTION: &str = "get attachment";
    let [issue_key, attachment_id] = args.require(&GET_ATTACHMENT_REQUIRED)?;
    let output_path = args.optional_text("outputPath");

    let issue = client
        .get_issue(&issue_key, Some("attachment"), None)
        .await
        .action(ACTION)?;

    let attachment = issue
        .fields
        .attachments()
        .iter()
        .find(|att| att.id == attachment_id || att.filename == attachment_id)
        .ok_or_else(|| ToolError::NotFound(format!("Attachment {attachment_id} not found")))?;

    let Some(content_url) = attachment.content.as_deref() else {
        return Err(ToolError::NoContent {
            attachment: attachment_id,
        });
    };
    let content = client.download(content_url).await.action(ACTION)?;

    if let Some(output_path) = output_path {
        tokio::fs::write(&output_path, &content).await.action(ACTION)?;
        return Ok(json!({
            "filename": attachment.filename,
            "size": attachment.size,
            "saved_to": output_path,
        }));
    }

    Ok(json!({
        "filename": attachment.filename,
        "size": attachment.size,
        "content": STANDARD.encode(&content),
    }))
}
