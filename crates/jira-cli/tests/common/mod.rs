//! Shared fixtures: a tool runner pointed at a mock Jira.

#![allow(dead_code)]

use jira::{JiraClient, JiraConfig};
use jira_cli::ToolRunner;
use serde_json::Value;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn runner_for(server: &MockServer) -> ToolRunner {
    let config =
        JiraConfig::resolve(Some(&server.uri()), Some("bot@example.com"), Some("token")).unwrap();
    ToolRunner::new(JiraClient::new(&config).unwrap())
}

/// Fail the test (when the server is dropped) if any request reaches Jira.
pub async fn forbid_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Call a tool that is expected to run, returning its payload.
pub async fn call(runner: &ToolRunner, tool: &str, arguments: Value) -> Value {
    let call = runner.call_tool(tool, arguments).await;
    assert!(call.success, "envelope failed: {:?}", call.error);
    call.result.expect("successful call carries a result")
}
