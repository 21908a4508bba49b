use unicase::UniCase;

use crate::error::{AssistantError, Result};
use crate::jira::jql::Order;
use crate::jira::{Jql, NewIssue, SearchQuery, Transition};

use super::ToolSet;
use super::format;
use super::requests::*;

/// Transition names that count as closing an issue
const CLOSING_TRANSITIONS: [&str; 2] = ["Done", "Closed"];

/// How many of the latest comments go into a summary prompt
const SUMMARY_COMMENT_COUNT: usize = 3;

/// First transition, in tracker order, that closes the issue
fn closing_transition(transitions: &[Transition]) -> Option<&Transition> {
    transitions.iter().find(|t| {
        let name = UniCase::new(t.name.trim());
        CLOSING_TRANSITIONS.iter().any(|c| UniCase::new(*c) == name)
    })
}

fn find_transition<'a>(transitions: &'a [Transition], name: &str) -> Option<&'a Transition> {
    let wanted = UniCase::new(name.trim());
    transitions.iter().find(|t| UniCase::new(t.name.as_str()) == wanted)
}

impl ToolSet {
    pub(super) async fn close_issue(&self, req: &CloseIssueRequest) -> Result<String> {
        let key = req.issue_id.trim();
        let transitions = self.tracker.transitions(key).await?;
        tracing::debug!(
            "transitions for {key}: {}",
            format::transition_names(&transitions)
        );

        match closing_transition(&transitions) {
            Some(transition) => {
                self.tracker.apply_transition(key, &transition.id).await?;
                Ok(format::closed(key))
            }
            None => Err(AssistantError::Validation(format!(
                "Could not close issue {key}. Valid transitions: {}",
                format::transition_names(&transitions)
            ))),
        }
    }

    pub(super) async fn create_issue(&self, req: &CreateIssueRequest) -> Result<String> {
        let issue = NewIssue {
            project_key: req.project_key.trim().to_string(),
            summary: req.summary.trim().to_string(),
            description: req
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            issue_type: req.issue_type.trim().to_string(),
        };
        let created = self.tracker.create_issue(&issue).await?;
        Ok(format::created(&created.key))
    }

    pub(super) async fn update_issue_status(&self, req: &UpdateIssueStatusRequest) -> Result<String> {
        let key = req.issue_id.trim();
        let transitions = self.tracker.transitions(key).await?;

        match find_transition(&transitions, &req.status) {
            Some(transition) => {
                self.tracker.apply_transition(key, &transition.id).await?;
                Ok(format::status_updated(key, &transition.name))
            }
            None => Err(AssistantError::Validation(format!(
                "Invalid status '{}' for issue {key}. Available transitions: {}",
                req.status.trim(),
                format::transition_names(&transitions)
            ))),
        }
    }

    pub(super) async fn get_issue_status(&self, req: &GetIssueStatusRequest) -> Result<String> {
        let issue = self.tracker.get_issue(req.issue_id.trim()).await?;
        Ok(format::current_status(&issue.key, &issue.status.name))
    }

    pub(super) async fn summarize_issue(&self, req: &SummarizeIssueRequest) -> Result<String> {
        let issue = self.tracker.get_issue(req.issue_id.trim()).await?;
        let prompt = format::summary_prompt(&issue, issue.recent_comments(SUMMARY_COMMENT_COUNT));
        let text = self.model.complete(&prompt).await?;
        Ok(format::summary(&issue.key, &text))
    }

    pub(super) async fn summarize_last_reported_issue(
        &self,
        req: &SummarizeLastReportedIssueRequest,
    ) -> Result<String> {
        let reporter = req.user_email.trim();
        let jql = Jql::new()
            .equals("reporter", reporter)
            .order_by("created", Order::Desc);
        let issues = self
            .tracker
            .search_issues(&SearchQuery::new(jql.to_string(), 1))
            .await?;

        let Some(latest) = issues.into_iter().next() else {
            return Err(AssistantError::NotFound(format!(
                "No issues found reported by {reporter}."
            )));
        };

        // Search results carry no comments, so summarize from a full fetch
        self.summarize_issue(&SummarizeIssueRequest {
            issue_id: latest.key,
        })
        .await
    }
}
