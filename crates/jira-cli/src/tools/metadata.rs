//! User, field and issue type lookups.

use jira::JiraClient;
use serde_json::{json, Value};

use crate::args::Arguments;
use crate::error::{ActionContext, ToolError};

pub(crate) const USER_REQUIRED: [&str; 1] = ["email"];

pub(crate) async fn get_user(
    client: &JiraClient,
    args: &Arguments<'_>,
) -> Result<Value, ToolError> {
    let [email] = args.require(&USER_REQUIRED)?;

    let users = client.search_users(&email).await.action("get user")?;
    let Some(user) = users.first() else {
        return Err(ToolError::NotFound(format!("User with email {email} not found")));
    };

    Ok(json!({
        "accountId": user.account_id,
        "displayName": user.display_name,
        "emailAddress": user.email_address,
        "active": user.active,
    }))
}

pub(crate) async fn list_fields(client: &JiraClient) -> Result<Value, ToolError> {
    let fields = client.fields().await.action("list fields")?;

    Ok(fields
        .iter()
        .map(|field| {
            json!({
                "id": field.id,
                "name": field.name,
                "custom": field.custom,
            })
        })
        .collect())
}

pub(crate) async fn list_issue_types(client: &JiraClient) -> Result<Value, ToolError> {
    let issue_types = client.issue_types().await.action("list issue types")?;

    Ok(issue_types
        .iter()
        .map(|it| {
            json!({
                "id": it.id,
                "name": it.name,
                "description": it.description,
            })
        })
        .collect())
}
