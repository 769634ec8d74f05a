//! Tool behaviour against a mock Jira.

mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::{call, forbid_requests, runner_for};
use serde_json::json;
use wiremock::matchers::{
    body_json, body_string_contains, header, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn issue_body(key: &str) -> serde_json::Value {
    json!({
        "id": "10001",
        "key": key,
        "fields": {
            "summary": "Login fails on Safari",
            "description": "Steps to reproduce...",
            "status": {"id": "1", "name": "Open"},
            "priority": {"id": "2", "name": "High"},
            "assignee": {"accountId": "abc", "displayName": "Sam Lee"},
            "issuetype": {"id": "10", "name": "Bug"},
            "comment": {
                "comments": [{
                    "id": "100",
                    "author": {"displayName": "Ana"},
                    "body": "Reproduced",
                    "created": "2024-03-01T10:00:00.000+0000"
                }]
            },
            "attachment": [{
                "id": "500",
                "filename": "trace.log",
                "size": 9,
                "created": "2024-03-01T11:00:00.000+0000",
                "mimeType": "text/plain",
                "content": "CONTENT_URL"
            }]
        }
    })
}

/// Issue JSON whose attachment content URL points back at `server`.
fn issue_with_attachment(server: &MockServer, key: &str) -> serde_json::Value {
    let body = issue_body(key).to_string().replace(
        "CONTENT_URL",
        &format!("{}/secure/attachment/500/trace.log", server.uri()),
    );
    serde_json::from_str(&body).unwrap()
}

async fn mount_issue(server: &MockServer, key: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/api/2/issue/{key}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_with_attachment(server, key)))
        .expect(times)
        .mount(server)
        .await;
}

// =============================================================================
// Issues
// =============================================================================

#[tokio::test]
async fn test_create_issue_maps_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue"))
        .and(body_json(json!({
            "fields": {
                "project": {"key": "TEST"},
                "summary": "New issue",
                "issuetype": {"name": "Task"},
                "description": "Details",
                "priority": {"name": "High"},
                "assignee": {"emailAddress": "sam@example.com"}
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "10002",
            "key": "TEST-2",
            "self": "https://jira.example.com/rest/api/2/issue/10002"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(
        &runner,
        "create_jira_issue",
        json!({
            "projectKey": "TEST",
            "summary": "New issue",
            "issueType": "Task",
            "description": "Details",
            "priority": "High",
            "assignee": "sam@example.com"
        }),
    )
    .await;

    assert_eq!(
        result,
        json!({
            "key": "TEST-2",
            "id": "10002",
            "self": "https://jira.example.com/rest/api/2/issue/10002"
        })
    );
}

#[tokio::test]
async fn test_get_issue_shapes_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/issue/TEST-1"))
        .and(query_param(
            "fields",
            "summary,description,status,priority,assignee,issuetype,comment,attachment",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_body("TEST-1")))
        .expect(1)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(&runner, "get_issue", json!({"issueKey": "TEST-1"})).await;

    assert_eq!(
        result,
        json!({
            "key": "TEST-1",
            "summary": "Login fails on Safari",
            "status": "Open",
            "priority": "High",
            "assignee": "Sam Lee",
            "type": "Bug",
            "description": "Steps to reproduce...",
            "comments": [{
                "id": "100",
                "author": "Ana",
                "body": "Reproduced",
                "created": "2024-03-01T10:00:00.000+0000"
            }],
            "attachments": [{
                "id": "500",
                "filename": "trace.log",
                "size": 9,
                "created": "2024-03-01T11:00:00.000+0000"
            }]
        })
    );
}

#[tokio::test]
async fn test_get_issue_with_sparse_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/issue/TEST-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "9",
            "key": "TEST-9",
            "fields": {"summary": "Bare", "assignee": null, "priority": null}
        })))
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(&runner, "get_issue", json!({"issueKey": "TEST-9"})).await;

    assert_eq!(result["assignee"], json!(null));
    assert_eq!(result["priority"], json!(null));
    assert_eq!(result["comments"], json!([]));
    assert_eq!(result["attachments"], json!([]));
}

#[tokio::test]
async fn test_update_issue_sends_present_fields() {
    let server = MockServer::start().await;
    mount_issue(&server, "TEST-1", 1).await;
    Mock::given(method("PUT"))
        .and(path("/rest/api/2/issue/TEST-1"))
        .and(body_json(json!({
            "fields": {
                "summary": "Renamed",
                "priority": {"name": "Low"}
            }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(
        &runner,
        "update_issue",
        json!({"issueKey": "TEST-1", "priority": "Low", "summary": "Renamed"}),
    )
    .await;

    assert_eq!(
        result,
        json!({"key": "TEST-1", "updated": true, "fields": ["summary", "priority"]})
    );
}

#[tokio::test]
async fn test_update_issue_without_fields_skips_put() {
    let server = MockServer::start().await;
    mount_issue(&server, "TEST-1", 1).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(&runner, "update_issue", json!({"issueKey": "TEST-1"})).await;

    assert_eq!(result, json!({"key": "TEST-1", "updated": true, "fields": []}));
}

#[tokio::test]
async fn test_delete_issue_checks_existence_first() {
    let server = MockServer::start().await;
    mount_issue(&server, "TEST-3", 1).await;
    Mock::given(method("DELETE"))
        .and(path("/rest/api/2/issue/TEST-3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(&runner, "delete_issue", json!({"issueKey": "TEST-3"})).await;

    assert_eq!(result, json!({"key": "TEST-3", "deleted": true}));
}

#[tokio::test]
async fn test_delete_missing_issue_reports_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/issue/TEST-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorMessages": ["Issue does not exist"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(&runner, "delete_issue", json!({"issueKey": "TEST-404"})).await;

    let error = result["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to delete issue: "));
    assert!(error.contains("Issue does not exist"));
}

#[tokio::test]
async fn test_search_scopes_jql_to_project() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("jql", "project = TEST AND status = Open"))
        .and(query_param("maxResults", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startAt": 0,
            "maxResults": 30,
            "total": 1,
            "issues": [issue_body("TEST-1")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(
        &runner,
        "search_issues",
        json!({"projectKey": "TEST", "jql": "status = Open"}),
    )
    .await;

    assert_eq!(
        result,
        json!([{
            "key": "TEST-1",
            "summary": "Login fails on Safari",
            "status": "Open",
            "priority": "High",
            "assignee": "Sam Lee",
            "type": "Bug"
        }])
    );
}

// =============================================================================
// Links & Metadata
// =============================================================================

#[tokio::test]
async fn test_create_issue_link_echoes_inputs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/issueLinkType"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issueLinkTypes": [
                {"id": "1", "name": "Blocks", "inward": "is blocked by", "outward": "blocks"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/issueLink"))
        .and(body_json(json!({
            "type": {"name": "Blocks"},
            "inwardIssue": {"key": "TEST-1"},
            "outwardIssue": {"key": "TEST-2"}
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(
        &runner,
        "create_issue_link",
        json!({"inwardIssue": "TEST-1", "outwardIssue": "TEST-2", "linkType": "blocks"}),
    )
    .await;

    assert_eq!(
        result,
        json!({
            "inwardIssue": "TEST-1",
            "outwardIssue": "TEST-2",
            "linkType": "blocks",
            "linked": true
        })
    );
}

#[tokio::test]
async fn test_get_user_returns_first_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/user/search"))
        .and(query_param("query", "sam@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "accountId": "abc",
                "displayName": "Sam Lee",
                "emailAddress": "sam@example.com",
                "active": true
            },
            {"accountId": "def", "displayName": "Sam Other", "active": false}
        ])))
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(&runner, "get_user", json!({"email": "sam@example.com"})).await;

    assert_eq!(
        result,
        json!({
            "accountId": "abc",
            "displayName": "Sam Lee",
            "emailAddress": "sam@example.com",
            "active": true
        })
    );
}

#[tokio::test]
async fn test_get_user_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/user/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(&runner, "get_user", json!({"email": "ghost@example.com"})).await;

    assert_eq!(
        result,
        json!({"error": "User with email ghost@example.com not found"})
    );
}

#[tokio::test]
async fn test_metadata_listings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/field"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "summary", "name": "Summary", "custom": false},
            {"id": "customfield_10010", "name": "Sprint", "custom": true},
            {"id": "issuekey", "name": "Key"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/issuetype"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "10", "name": "Bug", "description": "A problem"},
            {"id": "11", "name": "Task"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/issueLinkType"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issueLinkTypes": [
                {"id": "1", "name": "Blocks", "inward": "is blocked by", "outward": "blocks"}
            ]
        })))
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    assert_eq!(
        call(&runner, "list_fields", json!({})).await,
        json!([
            {"id": "summary", "name": "Summary", "custom": false},
            {"id": "customfield_10010", "name": "Sprint", "custom": true},
            {"id": "issuekey", "name": "Key", "custom": false}
        ])
    );
    assert_eq!(
        call(&runner, "list_issue_types", json!({})).await,
        json!([
            {"id": "10", "name": "Bug", "description": "A problem"},
            {"id": "11", "name": "Task", "description": null}
        ])
    );
    assert_eq!(
        call(&runner, "list_link_types", json!({})).await,
        json!([
            {"id": "1", "name": "Blocks", "inward": "is blocked by", "outward": "blocks"}
        ])
    );
}

// =============================================================================
// Comments & Attachments
// =============================================================================

#[tokio::test]
async fn test_add_comment_posts_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue/TEST-1/comment"))
        .and(body_json(json!({"body": "Looks good"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": "7", "body": "Looks good"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(
        &runner,
        "add_comment",
        json!({"issueKey": "TEST-1", "comment": "Looks good"}),
    )
    .await;

    assert_eq!(result, json!({"key": "TEST-1", "comment_added": true}));
}

fn attachment_created(filename: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!([
        {"id": "600", "filename": filename, "size": 5}
    ]))
}

#[tokio::test]
async fn test_attach_file_uploads_base_name() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("report.txt");
    std::fs::write(&file, "hello").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue/TEST-1/attachments"))
        .and(header("x-atlassian-token", "no-check"))
        .and(body_string_contains("filename=\"report.txt\""))
        .and(body_string_contains("hello"))
        .respond_with(attachment_created("report.txt"))
        .expect(1)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(
        &runner,
        "attach_file",
        json!({"issueKey": "TEST-1", "filePath": file.to_str().unwrap()}),
    )
    .await;

    assert_eq!(
        result,
        json!({"key": "TEST-1", "filename": "report.txt", "attached": true})
    );
}

#[tokio::test]
async fn test_attach_missing_file_makes_no_request() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let runner = runner_for(&server);

    let result = call(
        &runner,
        "attach_file",
        json!({"issueKey": "TEST-1", "filePath": "/no/such/file.txt"}),
    )
    .await;
    assert_eq!(result, json!({"error": "File not found: /no/such/file.txt"}));

    let result = call(
        &runner,
        "add_comment_with_attachment",
        json!({"issueKey": "TEST-1", "comment": "see file", "filePath": "/no/such/file.txt"}),
    )
    .await;
    assert_eq!(result, json!({"error": "File not found: /no/such/file.txt"}));
}

#[tokio::test]
async fn test_attach_content_uploads_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue/TEST-1/attachments"))
        .and(body_string_contains("filename=\"notes.md\""))
        .and(body_string_contains("# Notes"))
        .respond_with(attachment_created("notes.md"))
        .expect(1)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(
        &runner,
        "attach_content",
        json!({"issueKey": "TEST-1", "filename": "notes.md", "content": "# Notes"}),
    )
    .await;

    assert_eq!(
        result,
        json!({"key": "TEST-1", "filename": "notes.md", "attached": true})
    );
}

#[tokio::test]
async fn test_add_comment_with_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("screenshot.png");
    std::fs::write(&file, "png-bytes").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue/TEST-1/comment"))
        .and(body_json(json!({"body": "Screenshot attached"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "8"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue/TEST-1/attachments"))
        .and(body_string_contains("filename=\"screenshot.png\""))
        .respond_with(attachment_created("screenshot.png"))
        .expect(1)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(
        &runner,
        "add_comment_with_attachment",
        json!({
            "issueKey": "TEST-1",
            "comment": "Screenshot attached",
            "filePath": file.to_str().unwrap()
        }),
    )
    .await;

    assert_eq!(
        result,
        json!({
            "key": "TEST-1",
            "comment_added": true,
            "attachment_added": true,
            "filename": "screenshot.png"
        })
    );
}

async fn mount_download(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/secure/attachment/500/trace.log"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"log line\n".to_vec()))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_attachment_inline_as_base64() {
    let server = MockServer::start().await;
    mount_issue(&server, "TEST-1", 1).await;
    mount_download(&server).await;
    let runner = runner_for(&server);

    let result = call(
        &runner,
        "get_issue_attachment",
        json!({"issueKey": "TEST-1", "attachmentId": "500"}),
    )
    .await;

    assert_eq!(
        result,
        json!({
            "filename": "trace.log",
            "size": 9,
            "content": STANDARD.encode(b"log line\n")
        })
    );
}

#[tokio::test]
async fn test_get_attachment_by_filename_to_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("saved.log");

    let server = MockServer::start().await;
    mount_issue(&server, "TEST-1", 1).await;
    mount_download(&server).await;
    let runner = runner_for(&server);

    let result = call(
        &runner,
        "get_issue_attachment",
        json!({
            "issueKey": "TEST-1",
            "attachmentId": "trace.log",
            "outputPath": output.to_str().unwrap()
        }),
    )
    .await;

    assert_eq!(
        result,
        json!({
            "filename": "trace.log",
            "size": 9,
            "saved_to": output.to_str().unwrap()
        })
    );
    assert_eq!(std::fs::read(&output).unwrap(), b"log line\n");
}

#[tokio::test]
async fn test_get_attachment_numeric_id_and_missing() {
    let server = MockServer::start().await;
    mount_issue(&server, "TEST-1", 2).await;
    mount_download(&server).await;
    let runner = runner_for(&server);

    let found = call(
        &runner,
        "get_issue_attachment",
        json!({"issueKey": "TEST-1", "attachmentId": 500}),
    )
    .await;
    assert_eq!(found["filename"], "trace.log");

    let missing = call(
        &runner,
        "get_issue_attachment",
        json!({"issueKey": "TEST-1", "attachmentId": "999"}),
    )
    .await;
    assert_eq!(missing, json!({"error": "Attachment 999 not found"}));
}

#[tokio::test]
async fn test_get_attachment_without_content_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/issue/TEST-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "10001",
            "key": "TEST-1",
            "fields": {
                "attachment": [{"id": "501", "filename": "gone.bin", "size": 0}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let runner = runner_for(&server);

    let result = call(
        &runner,
        "get_issue_attachment",
        json!({"issueKey": "TEST-1", "attachmentId": "gone.bin"}),
    )
    .await;

    assert_eq!(
        result,
        json!({"error": "Attachment gone.bin has no content URL"})
    );
}
