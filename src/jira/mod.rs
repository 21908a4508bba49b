//! Jira issue tracker access.
//!
//! This module holds the tracker-native domain types, the `IssueTracker`
//! trait the tool set is written against, and the REST implementation
//! (`JiraClient`).

pub mod client;
pub mod error;
pub mod jql;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, Result};

pub use client::JiraClient;
pub use jql::Jql;

/// A Jira issue as seen by the tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Project-scoped key, e.g. `PROJ-42`
    pub key: String,
    pub summary: String,
    pub description: Option<String>,
    pub status: IssueStatus,
    /// Comments, most recent last
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Issue {
    /// The `n` most recent comments, oldest first
    pub fn recent_comments(&self, n: usize) -> &[Comment] {
        let start = self.comments.len().saturating_sub(n);
        &self.comments[start..]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueStatus {
    pub name: String,
    pub category: StatusCategory,
}

impl IssueStatus {
    pub fn new(name: impl Into<String>, category: StatusCategory) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }
}

/// Jira's fixed status categories, keyed by `statusCategory.key`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCategory {
    ToDo,
    InProgress,
    Done,
    Unknown,
}

impl StatusCategory {
    pub fn from_key(key: &str) -> Self {
        match key {
            "new" => StatusCategory::ToDo,
            "indeterminate" => StatusCategory::InProgress,
            "done" => StatusCategory::Done,
            _ => StatusCategory::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: Option<String>,
    pub body: String,
}

/// A workflow transition currently available on an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: u64,
    pub name: String,
    pub state: SprintState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintState {
    Future,
    Active,
    Closed,
}

enum_display_fromstr!(
    SprintState,
    |s: &str| AssistantError::Validation(format!(
        "unknown sprint state '{s}', expected future, active or closed"
    )),
    {
        Future => "future",
        Active => "active",
        Closed => "closed",
    }
);

/// Fields for a new issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub project_key: String,
    pub summary: String,
    pub description: Option<String>,
    pub issue_type: String,
}

/// Identifiers returned by the tracker after creating an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
}

/// A JQL search with a result cap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub jql: String,
    pub max_results: u32,
}

impl SearchQuery {
    pub fn new(jql: impl Into<String>, max_results: u32) -> Self {
        Self {
            jql: jql.into(),
            max_results,
        }
    }
}

/// Operations consumed from the issue tracker.
///
/// Every call is a fresh remote round trip: no retries, no caching and no
/// pagination beyond the caller-supplied cap.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch an issue with summary, description, status and comments
    async fn get_issue(&self, key: &str) -> Result<Issue>;

    /// List the transitions currently available on an issue
    async fn transitions(&self, key: &str) -> Result<Vec<Transition>>;

    /// Apply a transition by id
    async fn apply_transition(&self, key: &str, transition_id: &str) -> Result<()>;

    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue>;

    /// Run a JQL search, returning at most `query.max_results` issues
    async fn search_issues(&self, query: &SearchQuery) -> Result<Vec<Issue>>;

    /// List agile boards whose name matches `name`
    async fn boards(&self, name: &str) -> Result<Vec<Board>>;

    /// List the sprints of a board, optionally only those in `state`
    async fn sprints(&self, board_id: u64, state: Option<SprintState>) -> Result<Vec<Sprint>>;

    /// Set arbitrary fields on an issue; `null` clears a field
    async fn update_fields(
        &self,
        key: &str,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<()>;
}
