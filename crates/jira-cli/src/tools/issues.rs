//! Issue create/read/update/delete and JQL search.

use jira::{Issue, JiraClient};
use serde_json::{json, Map, Value};

use crate::args::Arguments;
use crate::error::{ActionContext, ToolError};

pub(crate) const CREATE_REQUIRED: [&str; 3] = ["projectKey", "summary", "issueType"];
pub(crate) const ISSUE_KEY_REQUIRED: [&str; 1] = ["issueKey"];
pub(crate) const SEARCH_REQUIRED: [&str; 2] = ["projectKey", "jql"];

/// Search results are capped at this many issues.
const SEARCH_MAX_RESULTS: u32 = 30;

const SEARCH_FIELDS: [&str; 6] = [
    "summary",
    "description",
    "status",
    "priority",
    "assignee",
    "issuetype",
];

const DETAIL_FIELDS: &str =
    "summary,description,status,priority,assignee,issuetype,comment,attachment";

/// Fields `update_issue` may change; `create_jira_issue` takes all but the summary as extras.
const EDITABLE_FIELDS: [&str; 4] = ["summary", "description", "priority", "assignee"];

/// Copy each of `names` present in `args` into `fields`, returning the
/// names applied in order. Priority is set by name and assignee by email.
fn apply_fields(
    args: &Arguments<'_>,
    names: &[&'static str],
    fields: &mut Map<String, Value>,
) -> Vec<&'static str> {
    let mut applied = Vec::new();
    for &name in names {
        let Some(value) = args.get(name) else {
            continue;
        };
        let value = match name {
            "priority" => json!({ "name": value }),
            "assignee" => json!({ "emailAddress": value }),
            _ => value.clone(),
        };
        fields.insert(name.to_string(), value);
        applied.push(name);
    }
    applied
}

pub(crate) async fn create_jira_issue(
    client: &JiraClient,
    args: &Arguments<'_>,
) -> Result<Value, ToolError> {
    let [project_key, summary, issue_type] = args.require(&CREATE_REQUIRED)?;

    let mut fields = Map::new();
    fields.insert("project".to_string(), json!({ "key": project_key }));
    fields.insert("summary".to_string(), Value::String(summary));
    fields.insert("issuetype".to_string(), json!({ "name": issue_type }));
    apply_fields(args, &EDITABLE_FIELDS[1..], &mut fields);

    let created = client.create_issue(&fields).await.action("create issue")?;
    Ok(json!({
        "key": created.key,
        "id": created.id,
        "self": created.self_url,
    }))
}

/// Render an issue the way search results and `get_issue` present it.
fn issue_summary(issue: &Issue) -> Map<String, Value> {
    let fields = &issue.fields;
    let mut out = Map::new();
    out.insert("key".to_string(), json!(issue.key));
    out.insert("summary".to_string(), json!(fields.summary));
    out.insert(
        "status".to_string(),
        json!(fields.status.as_ref().map(ToString::to_string)),
    );
    out.insert(
        "priority".to_string(),
        json!(fields.priority.as_ref().map(ToString::to_string)),
    );
    out.insert(
        "assignee".to_string(),
        json!(fields.assignee.as_ref().map(ToString::to_string)),
    );
    out.insert(
        "type".to_string(),
        json!(fields.issuetype.as_ref().map(ToString::to_string)),
    );
    out
}

pub(crate) async fn get_issue(
    client: &JiraClient,
    args: &Arguments<'_>,
) -> Result<Value, ToolError> {
    let [issue_key] = args.require(&ISSUE_KEY_REQUIRED)?;

    let issue = client
        .get_issue(&issue_key, Some(DETAIL_FIELDS), None)
        .await
        .action("get issue")?;

    let comments: Vec<Value> = issue
        .fields
        .comments()
        .iter()
        .map(|comment| {
            json!({
                "id": comment.id,
                "author": comment.author.as_ref().map(ToString::to_string),
                "body": comment.body,
                "created": comment.created,
            })
        })
        .collect();

    let attachments: Vec<Value> = issue
        .fields
        .attachments()
        .iter()
        .map(|attachment| {
            json!({
                "id": attachment.id,
                "filename": attachment.filename,
                "size": attachment.size,
                "created": attachment.created,
            })
        })
        .collect();

    let mut out = issue_summary(&issue);
    out.insert("description".to_string(), json!(issue.fields.description));
    out.insert("comments".to_string(), Value::Array(comments));
    out.insert("attachments".to_string(), Value::Array(attachments));
    Ok(Value::Object(out))
}

pub(crate) async fn update_issue(
    client: &JiraClient,
    args: &Arguments<'_>,
) -> Result<Value, ToolError> {
    let [issue_key] = args.require(&ISSUE_KEY_REQUIRED)?;

    // Fail with Jira's own message when the issue does not exist.
    client
        .get_issue(&issue_key, Some("summary"), None)
        .await
        .action("update issue")?;

    let mut fields = Map::new();
    let applied = apply_fields(args, &EDITABLE_FIELDS, &mut fields);
    if !fields.is_empty() {
        client
            .update_issue(&issue_key, &fields)
            .await
            .action("update issue")?;
    }

    Ok(json!({
        "key": issue_key,
        "updated": true,
        "fields": applied,
    }))
}

pub(crate) async fn delete_issue(
    client: &JiraClient,
    args: &Arguments<'_>,
) -> Result<Value, ToolError> {
    let [issue_key] = args.require(&ISSUE_KEY_REQUIRED)?;

    client
        .get_issue(&issue_key, Some("summary"), None)
        .await
        .action("delete issue")?;
    client
        .delete_issue(&issue_key)
        .await
        .action("delete issue")?;

    Ok(json!({
        "key": issue_key,
        "deleted": true,
    }))
}

pub(crate) async fn search_issues(
    client: &JiraClient,
    args: &Arguments<'_>,
) -> Result<Value, ToolError> {
    let [project_key, jql] = args.require(&SEARCH_REQUIRED)?;

    let full_jql = format!("project = {project_key} AND {jql}");
    let results = client
        .search_issues(&full_jql, SEARCH_MAX_RESULTS, &SEARCH_FIELDS)
        .await
        .action("search issues")?;

    Ok(Value::Array(
        results
            .issues
            .iter()
            .map(|issue| Value::Object(issue_summary(issue)))
            .collect(),
    ))
}
