//! REST client for the Jira v2 API.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use crate::config::JiraConfig;
use crate::error::{ConfigError, JiraError, Result};
use crate::models::{
    Attachment, Comment, ErrorCollection, Field, Issue, IssueLinkType, IssueLinkTypeList,
    IssueRef, IssueType, SearchResults, ServerInfo, User,
};

/// Path of the REST API below the instance URL
const API_PATH: &str = "rest/api/2";

/// Header Jira requires on attachment uploads to skip its XSRF check
const ATLASSIAN_TOKEN_HEADER: &str = "X-Atlassian-Token";

/// Accept header for attachment downloads, which are rarely JSON
const DOWNLOAD_ACCEPT: &str = "application/json,*/*;q=0.9";

/// Jira REST client using basic auth (account email + API token).
#[derive(Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    api_url: Url,
    email: String,
    api_token: String,
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("api_url", &self.api_url.as_str())
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    /// Create a client for the instance described by `config`.
    ///
    /// No request is made; call [`JiraClient::server_info`] to verify the
    /// connection and credentials.
    pub fn new(config: &JiraConfig) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: config.base_url.clone(),
            reason,
        };

        let mut api_url = Url::parse(&config.base_url).map_err(|e| invalid(e.to_string()))?;
        if api_url.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }
        if let Ok(mut segments) = api_url.path_segments_mut() {
            segments.pop_if_empty().extend(API_PATH.split('/'));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(concat!("jira-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url,
            email: config.email.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// Base URL of the REST API (e.g. `https://acme.atlassian.net/rest/api/2`)
    #[must_use]
    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.email, Some(&self.api_token))
    }

    /// Send a request and turn non-2xx statuses into [`JiraError::Api`].
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorCollection>(&body)
            .ok()
            .and_then(|errors| errors.summary())
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        debug!(status = status.as_u16(), %url, "Jira request failed");
        Err(JiraError::Api {
            status: status.as_u16(),
            url,
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let url = response.url().to_string();
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|error| JiraError::Decode { url, error })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T> {
        let request = self.request(Method::GET, self.endpoint(segments)).query(query);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<Response> {
        let request = self.request(method, self.endpoint(segments)).json(body);
        self.send(request).await
    }

    // =========================================================================
    // Instance
    // =========================================================================

    /// Fetch instance details. Used as a connection and credential check.
    #[instrument(skip(self))]
    pub async fn server_info(&self) -> Result<ServerInfo> {
        let info: ServerInfo = self.get(&["serverInfo"], &[]).await?;
        debug!(version = ?info.version, "Connected to Jira");
        Ok(info)
    }

    // =========================================================================
    // Issue Operations
    // =========================================================================

    /// Create an issue from a `fields` object.
    #[instrument(skip(self, fields))]
    pub async fn create_issue(&self, fields: &Map<String, Value>) -> Result<IssueRef> {
        let response = self
            .send_json(Method::POST, &["issue"], &json!({ "fields": fields }))
            .await?;
        let created: IssueRef = Self::decode(response).await?;
        debug!(key = %created.key, "Created issue");
        Ok(created)
    }

    /// Get an issue, optionally restricting `fields` and adding `expand`
    /// (both comma-separated).
    #[instrument(skip(self))]
    pub async fn get_issue(
        &self,
        issue_key: &str,
        fields: Option<&str>,
        expand: Option<&str>,
    ) -> Result<Issue> {
        let mut query = Vec::new();
        if let Some(fields) = fields {
            query.push(("fields", fields));
        }
        if let Some(expand) = expand {
            query.push(("expand", expand));
        }
        self.get(&["issue", issue_key], &query).await
    }

    /// Update issue fields.
    #[instrument(skip(self, fields))]
    pub async fn update_issue(&self, issue_key: &str, fields: &Map<String, Value>) -> Result<()> {
        self.send_json(Method::PUT, &["issue", issue_key], &json!({ "fields": fields }))
            .await?;
        debug!(fields = fields.len(), "Updated issue");
        Ok(())
    }

    /// Delete an issue. Fails if it has subtasks.
    #[instrument(skip(self))]
    pub async fn delete_issue(&self, issue_key: &str) -> Result<()> {
        let request = self
            .request(Method::DELETE, self.endpoint(&["issue", issue_key]))
            .query(&[("deleteSubtasks", "false")]);
        self.send(request).await?;
        Ok(())
    }

    /// Run a JQL search.
    #[instrument(skip(self))]
    pub async fn search_issues(
        &self,
        jql: &str,
        max_results: u32,
        fields: &[&str],
    ) -> Result<SearchResults> {
        let max_results = max_results.to_string();
        let fields = fields.join(",");
        let results: SearchResults = self
            .get(
                &["search"],
                &[
                    ("jql", jql),
                    ("startAt", "0"),
                    ("maxResults", max_results.as_str()),
                    ("fields", fields.as_str()),
                ],
            )
            .await?;
        debug!(total = results.total, returned = results.issues.len(), "Search complete");
        Ok(results)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Add a plain-text comment.
    #[instrument(skip(self, body))]
    pub async fn add_comment(&self, issue_key: &str, body: &str) -> Result<Comment> {
        let response = self
            .send_json(
                Method::POST,
                &["issue", issue_key, "comment"],
                &json!({ "body": body }),
            )
            .await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// List the issue link types configured on the instance.
    #[instrument(skip(self))]
    pub async fn issue_link_types(&self) -> Result<Vec<IssueLinkType>> {
        let list: IssueLinkTypeList = self.get(&["issueLinkType"], &[]).await?;
        Ok(list.issue_link_types)
    }

    /// Link two issues.
    ///
    /// `link_type` may be a link type name or one of its inward/outward
    /// phrases; see [`resolve_link_type`].
    #[instrument(skip(self))]
    pub async fn create_issue_link(
        &self,
        link_type: &str,
        inward_issue: &str,
        outward_issue: &str,
    ) -> Result<()> {
        let types = self.issue_link_types().await?;
        let (name, inward, outward) =
            resolve_link_type(&types, link_type, inward_issue, outward_issue);

        let body = json!({
            "type": { "name": name },
            "inwardIssue": { "key": inward },
            "outwardIssue": { "key": outward },
        });
        self.send_json(Method::POST, &["issueLink"], &body).await?;
        debug!(link_type = %name, "Linked issues");
        Ok(())
    }

    // =========================================================================
    // Users & Metadata
    // =========================================================================

    /// Search users by name or email.
    #[instrument(skip(self))]
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>> {
        self.get(&["user", "search"], &[("query", query)]).await
    }

    /// List all system and custom fields.
    #[instrument(skip(self))]
    pub async fn fields(&self) -> Result<Vec<Field>> {
        self.get(&["field"], &[]).await
    }

    /// List all issue types.
    #[instrument(skip(self))]
    pub async fn issue_types(&self) -> Result<Vec<IssueType>> {
        self.get(&["issuetype"], &[]).await
    }

    // =========================================================================
    // Attachments
    // =========================================================================

    /// Upload `content` as an attachment named `filename`.
    #[instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn add_attachment(
        &self,
        issue_key: &str,
        filename: &str,
        content: Vec<u8>,
    ) -> Result<Vec<Attachment>> {
        let form = Form::new().part("file", Part::bytes(content).file_name(filename.to_string()));
        let request = self
            .request(
                Method::POST,
                self.endpoint(&["issue", issue_key, "attachments"]),
            )
            .header(ATLASSIAN_TOKEN_HEADER, "no-check")
            .multipart(form);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    /// Download an attachment body from its absolute content URL.
    #[instrument(skip(self))]
    pub async fn download(&self, content_url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(content_url).map_err(|e| JiraError::InvalidUrl {
            url: content_url.to_string(),
            reason: e.to_string(),
        })?;
        let request = self
            .request(Method::GET, url)
            .header(ACCEPT, DOWNLOAD_ACCEPT);
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), "Downloaded attachment");
        Ok(bytes.to_vec())
    }
}

/// Map a requested link type onto a configured one.
///
/// An exact type name is used as-is. An outward phrase ("blocks") maps to
/// its type name. An inward phrase ("is blocked by") maps to its type name
/// and swaps the two issues so the relation reads the same way. Anything
/// else is passed through unchanged.
#[must_use]
pub fn resolve_link_type<'a>(
    types: &[IssueLinkType],
    requested: &str,
    inward_issue: &'a str,
    outward_issue: &'a str,
) -> (String, &'a str, &'a str) {
    if types.iter().any(|t| t.name == requested) {
        return (requested.to_string(), inward_issue, outward_issue);
    }
    for link_type in types {
        if link_type.outward == requested {
            return (link_type.name.clone(), inward_issue, outward_issue);
        }
        if link_type.inward == requested {
            return (link_type.name.clone(), outward_issue, inward_issue);
        }
    }
    (requested.to_string(), inward_issue, outward_issue)
}
