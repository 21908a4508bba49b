//! Tool request types and input validation.
//!
//! This module contains the argument structs for every tool, along with the
//! checks applied before any tracker call is made.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, Result};

/// Jira's limit on summary length
pub const MAX_SUMMARY_LENGTH: usize = 255;

/// Largest page Jira returns from a search
pub const MAX_SEARCH_RESULTS: u32 = 100;

pub const DEFAULT_ISSUE_TYPE: &str = "Task";
pub const DEFAULT_BACKLOG_LIMIT: u32 = 5;

fn default_issue_type() -> String {
    DEFAULT_ISSUE_TYPE.to_string()
}

fn default_backlog_limit() -> u32 {
    DEFAULT_BACKLOG_LIMIT
}

/// Reject empty or whitespace-only values
fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AssistantError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

static ISSUE_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z][a-z0-9_]*-[0-9]+$").expect("issue key regex should be valid")
});

/// Require a key shaped like `PROJ-123`
fn require_issue_key(value: &str) -> Result<()> {
    require(value, "issue_id")?;
    if !ISSUE_KEY_REGEX.is_match(value.trim()) {
        return Err(AssistantError::Validation(format!(
            "'{}' is not an issue key (expected something like PROJ-123)",
            value.trim()
        )));
    }
    Ok(())
}

// ============================================================================
// Issue tools
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct CloseIssueRequest {
    #[schemars(description = "Key of the issue to close, e.g. PROJ-123")]
    pub issue_id: String,
}

impl CloseIssueRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        require_issue_key(&self.issue_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct CreateIssueRequest {
    #[schemars(description = "Key of the project to create the issue in, e.g. PROJ")]
    pub project_key: String,

    #[schemars(description = "One-line summary (title) of the issue")]
    pub summary: String,

    #[schemars(description = "Optional longer description of the issue")]
    #[serde(default)]
    pub description: Option<String>,

    #[schemars(description = "Issue type name such as Task, Bug or Story (default: Task)")]
    #[serde(default = "default_issue_type")]
    pub issue_type: String,
}

impl CreateIssueRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        require(&self.project_key, "project_key")?;
        require(&self.summary, "summary")?;
        require(&self.issue_type, "issue_type")?;

        let len = self.summary.chars().count();
        if len > MAX_SUMMARY_LENGTH {
            return Err(AssistantError::Validation(format!(
                "summary is {len} characters, the maximum is {MAX_SUMMARY_LENGTH}"
            )));
        }
        if self.summary.contains(['\n', '\r']) {
            return Err(AssistantError::Validation(
                "summary must be a single line".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct GetIssueStatusRequest {
    #[schemars(description = "Key of the issue, e.g. PROJ-123")]
    pub issue_id: String,
}

impl GetIssueStatusRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        require_issue_key(&self.issue_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct UpdateIssueStatusRequest {
    #[schemars(description = "Key of the issue, e.g. PROJ-123")]
    pub issue_id: String,

    #[schemars(description = "Name of the transition to apply, e.g. In Progress")]
    pub status: String,
}

impl UpdateIssueStatusRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        require_issue_key(&self.issue_id)?;
        require(&self.status, "status")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct SummarizeIssueRequest {
    #[schemars(description = "Key of the issue to summarize, e.g. PROJ-123")]
    pub issue_id: String,
}

impl SummarizeIssueRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        require_issue_key(&self.issue_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct SummarizeLastReportedIssueRequest {
    #[schemars(description = "Email address (or account id) of the reporter")]
    pub user_email: String,
}

impl SummarizeLastReportedIssueRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        require(&self.user_email, "user_email")
    }
}

// ============================================================================
// Backlog and sprint tools
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct GetBacklogIssuesRequest {
    #[schemars(description = "Key of the project, e.g. PROJ")]
    pub project_key: String,

    #[schemars(description = "Maximum number of issues to return (default: 5)")]
    #[serde(default = "default_backlog_limit")]
    pub max_results: u32,
}

impl GetBacklogIssuesRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        require(&self.project_key, "project_key")?;
        if self.max_results == 0 || self.max_results > MAX_SEARCH_RESULTS {
            return Err(AssistantError::Validation(format!(
                "max_results must be between 1 and {MAX_SEARCH_RESULTS}, got {}",
                self.max_results
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct GetActiveSprintRequest {
    #[schemars(description = "Key of the project, e.g. PROJ")]
    pub project_key: String,
}

impl GetActiveSprintRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        require(&self.project_key, "project_key")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct GetSprintIssuesByStatusRequest {
    #[schemars(description = "Key of the project, e.g. PROJ")]
    pub project_key: String,

    #[schemars(
        description = "Exact status name to filter by. Omit to list all issues grouped into To Do, In Progress and Done"
    )]
    #[serde(default)]
    pub status: Option<String>,
}

impl GetSprintIssuesByStatusRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        require(&self.project_key, "project_key")?;
        if let Some(status) = &self.status {
            require(status, "status")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct MoveIssueSprintBacklogRequest {
    #[schemars(description = "Key of the issue to move, e.g. PROJ-123")]
    pub issue_id: String,

    #[schemars(description = "Key of the project whose active sprint is used, e.g. PROJ")]
    pub project_key: String,

    #[schemars(description = "Where to move the issue: 'backlog' or 'sprint'")]
    pub move_to: String,
}

impl MoveIssueSprintBacklogRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        require_issue_key(&self.issue_id)?;
        require(&self.project_key, "project_key")
    }
}
