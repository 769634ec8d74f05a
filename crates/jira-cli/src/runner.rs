//! Tool dispatch and the uniform result envelope.

use jira::JiraClient;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::args::Arguments;
use crate::tools::Tool;

/// Longest result text shown in verbose logs before truncation.
const PREVIEW_CHARS: usize = 200;

/// Outcome of one tool call.
///
/// `success` reports whether the tool ran. A tool that ran but failed
/// against Jira still succeeds here; its `result` is `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCall {
    pub success: bool,
    pub tool: String,
    pub arguments: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolCall {
    fn completed(tool: &str, arguments: Value, result: Value) -> Self {
        Self {
            success: true,
            tool: tool.to_string(),
            arguments,
            result: Some(result),
            error: None,
        }
    }

    fn rejected(tool: &str, arguments: Value, error: String) -> Self {
        debug!(tool, %error, "Tool call rejected");
        Self {
            success: false,
            tool: tool.to_string(),
            arguments,
            result: None,
            error: Some(error),
        }
    }
}

/// Routes tool names to tools over a shared Jira client.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    client: JiraClient,
}

impl ToolRunner {
    #[must_use]
    pub fn new(client: JiraClient) -> Self {
        Self { client }
    }

    /// Names of all callable tools.
    #[must_use]
    pub fn list_available_tools(&self) -> Vec<&'static str> {
        Tool::ALL.iter().map(|tool| tool.name()).collect()
    }

    /// Call `tool_name` with a JSON object of arguments.
    ///
    /// `null` arguments are treated as `{}`. The arguments are echoed back
    /// unchanged in the envelope.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(&self, tool_name: &str, arguments: Value) -> ToolCall {
        let arguments = if arguments.is_null() {
            Value::Object(Map::new())
        } else {
            arguments
        };
        debug!(arguments = %arguments, "Calling tool");

        let Some(tool) = Tool::from_name(tool_name) else {
            return ToolCall::rejected(
                tool_name,
                arguments,
                format!("Tool '{tool_name}' not found"),
            );
        };
        let result = match arguments.as_object() {
            Some(map) => tool.run(&self.client, &Arguments::new(map)).await,
            None => {
                return ToolCall::rejected(
                    tool_name,
                    arguments,
                    "Arguments must be a JSON object".to_string(),
                )
            }
        };
        debug!(result = %preview(&result.to_string()), "Tool finished");

        ToolCall::completed(tool_name, arguments, result)
    }
}

/// First [`PREVIEW_CHARS`] characters of `text`, with `...` when cut.
fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
