//! Jira REST implementation of `IssueTracker`.
//!
//! Uses the platform API (`/rest/api/2`) for issues, transitions and search
//! (`search/jql`, falling back to the classic `search` where it is missing),
//! and the agile API (`/rest/agile/1.0`) for boards and sprints. Requests are
//! authenticated with HTTP basic auth (account email + API token).
//!
//! # Security Note - Logging
//!
//! The API token is held in a `SecretBox` and only exposed while building the
//! Authorization header. reqwest marks basic-auth headers as sensitive, so
//! they are redacted from its debug output.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretBox};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use url::Url;

use crate::config::Config;
use crate::error::{AssistantError, Result};

use super::error::{ApiError, transport_error};
use super::{
    Board, Comment, CreatedIssue, Issue, IssueStatus, IssueTracker, NewIssue, SearchQuery, Sprint,
    SprintState, StatusCategory, Transition,
};

/// Fields requested when fetching a single issue
const ISSUE_FIELDS: &str = "summary,description,status,comment";

/// Fields requested for search results
const SEARCH_FIELDS: &str = "summary,description,status";

/// Page size for board and sprint listings
const AGILE_PAGE_SIZE: u32 = 50;

/// Jira Cloud / Server REST client
pub struct JiraClient {
    client: Client,
    base_url: Url,
    email: String,
    api_token: SecretBox<String>,
}

impl JiraClient {
    /// Create a client from configuration (environment variables win)
    pub fn from_config(config: &Config) -> Result<Self> {
        let server = config.jira_server().ok_or_else(|| {
            AssistantError::Config(
                "Jira server not configured. Set JIRA_SERVER or run: jira-assistant config set jira.server <url>".to_string(),
            )
        })?;
        let email = config.jira_email().ok_or_else(|| {
            AssistantError::Config(
                "Jira email not configured. Set JIRA_EMAIL or run: jira-assistant config set jira.email <email>".to_string(),
            )
        })?;
        let api_token = config.jira_api_token().ok_or_else(|| {
            AssistantError::Config(
                "Jira API token not configured. Set JIRA_API_TOKEN or run: jira-assistant config set jira.api_token <token>".to_string(),
            )
        })?;

        Self::new(&server, &email, &api_token, config.timeout())
    }

    /// Create a client for `server` with explicit credentials
    ///
    /// Configures the HTTP client with the given total timeout and a connect
    /// timeout of at most 10s.
    pub fn new(server: &str, email: &str, api_token: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(server.trim()).map_err(|e| {
            AssistantError::Config(format!("invalid Jira server URL '{server}': {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AssistantError::Config(format!(
                "invalid Jira server URL '{server}': not a base URL"
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(concat!("jira-assistant/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            email: email.to_string(),
            api_token: SecretBox::new(Box::new(api_token.to_string())),
        })
    }

    /// Build an endpoint URL from path segments; each segment is percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                AssistantError::Config(format!("invalid Jira server URL '{}'", self.base_url))
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.email, Some(self.api_token.expose_secret()))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send a request, mapping non-success statuses onto the error taxonomy
    async fn send(&self, request: RequestBuilder, resource: &str) -> Result<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status, &body);
        tracing::debug!("Jira request for {resource} failed: {error}");
        Err(error.into_assistant_error(resource))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<T> {
        self.send(request, resource)
            .await?
            .json::<T>()
            .await
            .map_err(transport_error)
    }

    async fn search_at(&self, path: &[&str], query: &SearchQuery) -> Result<Vec<Issue>> {
        let url = self.endpoint(path)?;
        let max_results = query.max_results.to_string();
        let request = self.client.get(url).query(&[
            ("jql", query.jql.as_str()),
            ("maxResults", max_results.as_str()),
            ("fields", SEARCH_FIELDS),
        ]);
        let response: SearchResponse = self.send_json(request, "search").await?;
        Ok(response.issues.into_iter().map(convert_issue).collect())
    }
}

// Jira wire types

#[derive(Debug, Deserialize)]
struct WireIssue {
    key: String,
    fields: WireFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFields {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<WireStatus>,
    #[serde(default)]
    comment: Option<WireCommentPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireStatus {
    name: String,
    #[serde(default)]
    status_category: Option<WireStatusCategory>,
}

#[derive(Debug, Deserialize)]
struct WireStatusCategory {
    key: String,
}

#[derive(Debug, Deserialize)]
struct WireCommentPage {
    #[serde(default)]
    comments: Vec<WireComment>,
}

#[derive(Debug, Deserialize)]
struct WireComment {
    #[serde(default)]
    author: Option<WireUser>,
    #[serde(default)]
    body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransitionsResponse {
    transitions: Vec<Transition>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<WireIssue>,
}

#[derive(Debug, Deserialize)]
struct PagedValues<T> {
    #[serde(default = "Vec::new")]
    values: Vec<T>,
}

fn convert_issue(issue: WireIssue) -> Issue {
    let fields = issue.fields;
    let status = match fields.status {
        Some(status) => IssueStatus {
            category: status
                .status_category
                .map(|c| StatusCategory::from_key(&c.key))
                .unwrap_or(StatusCategory::Unknown),
            name: status.name,
        },
        None => IssueStatus::new("Unknown", StatusCategory::Unknown),
    };

    let comments = fields
        .comment
        .map(|page| {
            page.comments
                .into_iter()
                .map(|c| Comment {
                    author: c.author.and_then(|a| a.display_name),
                    body: c.body,
                })
                .collect()
        })
        .unwrap_or_default();

    Issue {
        key: issue.key,
        summary: fields.summary.unwrap_or_default(),
        description: fields.description.filter(|d| !d.trim().is_empty()),
        status,
        comments,
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn get_issue(&self, key: &str) -> Result<Issue> {
        let url = self.endpoint(&["rest", "api", "2", "issue", key])?;
        let request = self.client.get(url).query(&[("fields", ISSUE_FIELDS)]);
        let issue: WireIssue = self.send_json(request, &format!("issue {key}")).await?;
        Ok(convert_issue(issue))
    }

    async fn transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let url = self.endpoint(&["rest", "api", "2", "issue", key, "transitions"])?;
        let response: TransitionsResponse = self
            .send_json(self.client.get(url), &format!("issue {key}"))
            .await?;
        Ok(response.transitions)
    }

    async fn apply_transition(&self, key: &str, transition_id: &str) -> Result<()> {
        let url = self.endpoint(&["rest", "api", "2", "issue", key, "transitions"])?;
        let body = json!({ "transition": { "id": transition_id } });
        self.send(self.client.post(url).json(&body), &format!("issue {key}"))
            .await?;
        tracing::info!("applied transition {transition_id} to {key}");
        Ok(())
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue> {
        let url = self.endpoint(&["rest", "api", "2", "issue"])?;
        let mut fields = Map::new();
        fields.insert("project".into(), json!({ "key": issue.project_key }));
        fields.insert("summary".into(), json!(issue.summary));
        if let Some(description) = &issue.description {
            fields.insert("description".into(), json!(description));
        }
        fields.insert("issuetype".into(), json!({ "name": issue.issue_type }));

        let request = self.client.post(url).json(&json!({ "fields": fields }));
        let created: CreatedIssue = self
            .send_json(request, &format!("project {}", issue.project_key))
            .await?;
        tracing::info!("created issue {}", created.key);
        Ok(created)
    }

    async fn search_issues(&self, query: &SearchQuery) -> Result<Vec<Issue>> {
        tracing::debug!("searching: {}", query.jql);
        match self.search_at(&["rest", "api", "2", "search", "jql"], query).await {
            // Server and Data Center only have the classic endpoint
            Err(AssistantError::NotFound(_)) => {
                tracing::debug!("search/jql not available, using /rest/api/2/search");
                self.search_at(&["rest", "api", "2", "search"], query).await
            }
            other => other,
        }
    }

    async fn boards(&self, name: &str) -> Result<Vec<Board>> {
        let url = self.endpoint(&["rest", "agile", "1.0", "board"])?;
        let page_size = AGILE_PAGE_SIZE.to_string();
        let request = self
            .client
            .get(url)
            .query(&[("name", name), ("maxResults", page_size.as_str())]);
        let page: PagedValues<Board> = self
            .send_json(request, &format!("boards named {name}"))
            .await?;
        Ok(page.values)
    }

    async fn sprints(&self, board_id: u64, state: Option<SprintState>) -> Result<Vec<Sprint>> {
        let board = board_id.to_string();
        let url = self.endpoint(&["rest", "agile", "1.0", "board", &board, "sprint"])?;
        let page_size = AGILE_PAGE_SIZE.to_string();
        let mut request = self
            .client
            .get(url)
            .query(&[("maxResults", page_size.as_str())]);
        // Listed oldest first, so filter before the page cap applies
        if let Some(state) = state {
            request = request.query(&[("state", state.to_string())]);
        }
        let page: PagedValues<Sprint> = self
            .send_json(request, &format!("board {board_id}"))
            .await?;
        Ok(page.values)
    }

    async fn update_fields(&self, key: &str, fields: Map<String, Value>) -> Result<()> {
        let url = self.endpoint(&["rest", "api", "2", "issue", key])?;
        let request = self.client.put(url).json(&json!({ "fields": fields }));
        self.send(request, &format!("issue {key}")).await?;
        tracing::info!("updated fields on {key}");
        Ok(())
    }
}
