//! The fixed set of issue tracker operations the assistant can perform.
//!
//! `ToolSet` executes a `ToolCall` against an `IssueTracker` (and, for the
//! summarization tools, a `LanguageModel`) and always produces displayable
//! text. Tracker failures never escape: they are rendered as `❌` messages.

pub mod catalog;
pub mod format;
pub mod requests;

mod issues;
mod sprints;

use std::sync::Arc;

use crate::config::DEFAULT_SPRINT_FIELD;
use crate::jira::IssueTracker;
use crate::llm::LanguageModel;

pub use catalog::{ToolCall, definitions};
pub use requests::*;

pub struct ToolSet {
    tracker: Arc<dyn IssueTracker>,
    model: Arc<dyn LanguageModel>,
    /// Custom field holding an issue's sprint
    sprint_field: String,
}

impl ToolSet {
    pub fn new(tracker: Arc<dyn IssueTracker>, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            tracker,
            model,
            sprint_field: DEFAULT_SPRINT_FIELD.to_string(),
        }
    }

    pub fn with_sprint_field(mut self, field: impl Into<String>) -> Self {
        self.sprint_field = field.into();
        self
    }

    /// Run one tool call and render its outcome.
    ///
    /// Arguments are validated before any tracker call; a failed check or a
    /// failed tracker call becomes a `❌` message.
    pub async fn execute(&self, call: &ToolCall) -> String {
        let name = call.name();
        tracing::debug!("executing tool {name}");

        if let Err(e) = call.validate() {
            tracing::debug!("rejected arguments for {name}: {e}");
            return format::failure(&e);
        }

        let result = match call {
            ToolCall::CloseIssue(req) => self.close_issue(req).await,
            ToolCall::CreateIssue(req) => self.create_issue(req).await,
            ToolCall::UpdateIssueStatus(req) => self.update_issue_status(req).await,
            ToolCall::GetIssueStatus(req) => self.get_issue_status(req).await,
            ToolCall::SummarizeIssue(req) => self.summarize_issue(req).await,
            ToolCall::SummarizeLastReportedIssue(req) => {
                self.summarize_last_reported_issue(req).await
            }
            ToolCall::GetBacklogIssues(req) => self.get_backlog_issues(req).await,
            ToolCall::GetActiveSprint(req) => self.get_active_sprint(req).await,
            ToolCall::GetSprintIssuesByStatus(req) => self.get_sprint_issues_by_status(req).await,
            ToolCall::MoveIssueSprintBacklog(req) => self.move_issue_sprint_backlog(req).await,
        };

        match result {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("tool {name} failed: {e}");
                format::failure(&e)
            }
        }
    }
}
