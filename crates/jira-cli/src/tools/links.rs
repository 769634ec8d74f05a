//! Issue links and link types.

use jira::JiraClient;
use serde_json::{json, Value};

use crate::args::Arguments;
use crate::error::{ActionContext, ToolError};

pub(crate) const LINK_REQUIRED: [&str; 3] = ["inwardIssue", "outwardIssue", "linkType"];

pub(crate) async fn create_issue_link(
    client: &JiraClient,
    args: &Arguments<'_>,
) -> Result<Value, ToolError> {
    let [inward_issue, outward_issue, link_type] = args.require(&LINK_REQUIRED)?;

    client
        .create_issue_link(&link_type, &inward_issue, &outward_issue)
        .await
        .action("create issue link")?;

    Ok(json!({
        "inwardIssue": inward_issue,
        "outwardIssue": outward_issue,
        "linkType": link_type,
        "linked": true,
    }))
}

pub(crate) async fn list_link_types(client: &JiraClient) -> Result<Value, ToolError> {
    let link_types = client
        .issue_link_types()
        .await
        .action("list link types")?;

    Ok(link_types
        .iter()
        .map(|lt| {
            json!({
                "id": lt.id,
                "name": lt.name,
                "inward": lt.inward,
                "outward": lt.outward,
            })
        })
        .collect())
}
