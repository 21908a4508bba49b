use serde_json::{Map, Value, json};
use unicase::UniCase;

use crate::error::{AssistantError, Result};
use crate::jira::jql::Order;
use crate::jira::{Board, Issue, Jql, SearchQuery, Sprint, SprintState, StatusCategory};

use super::ToolSet;
use super::format;
use super::requests::*;

/// Cap on issues listed from a sprint
pub const SPRINT_ISSUE_LIMIT: u32 = 20;

/// Where `move_issue_sprint_backlog` sends an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    Backlog,
    Sprint,
}

enum_display_fromstr!(
    MoveTarget,
    |_: &str| AssistantError::Validation("Invalid option! Use 'backlog' or 'sprint'.".to_string()),
    {
        Backlog => "backlog",
        Sprint => "sprint",
    }
);

/// Grouping used when sprint issues are listed without a status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    ToDo,
    InProgress,
    Done,
}

impl Bucket {
    /// Classify by status name: "done" anywhere wins, then "progress"
    pub fn for_status(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("done") {
            Bucket::Done
        } else if name.contains("progress") {
            Bucket::InProgress
        } else {
            Bucket::ToDo
        }
    }
}

/// Pick the board named exactly like the project
fn project_board<'a>(project_key: &str, boards: &'a [Board]) -> Result<&'a Board> {
    let wanted = UniCase::new(project_key);
    let mut matching = boards
        .iter()
        .filter(|b| UniCase::new(b.name.as_str()) == wanted);

    let Some(board) = matching.next() else {
        return Err(AssistantError::NotFound(format!(
            "No boards found for project {project_key}."
        )));
    };

    let others: Vec<u64> = matching.map(|b| b.id).collect();
    if !others.is_empty() {
        tracing::warn!(
            "several boards are named {project_key}; using board {} and ignoring {:?}",
            board.id,
            others
        );
    }
    Ok(board)
}

impl ToolSet {
    /// Resolve the active sprint of the project's board
    pub(super) async fn active_sprint(&self, project_key: &str) -> Result<Option<Sprint>> {
        let boards = self.tracker.boards(project_key).await?;
        let board = project_board(project_key, &boards)?;

        let mut active = self
            .tracker
            .sprints(board.id, Some(SprintState::Active))
            .await?
            .into_iter()
            .filter(|s| s.state == SprintState::Active);
        let sprint = active.next();
        if let Some(sprint) = &sprint
            && active.next().is_some()
        {
            tracing::warn!(
                "board {} has several active sprints; using {}",
                board.id,
                sprint.name
            );
        }
        Ok(sprint)
    }

    pub(super) async fn get_backlog_issues(&self, req: &GetBacklogIssuesRequest) -> Result<String> {
        let project_key = req.project_key.trim();
        let jql = Jql::new()
            .equals("project", project_key)
            .empty("sprint")
            .not_equals_keyword("statusCategory", "Done")
            .order_by("created", Order::Desc);

        let mut issues: Vec<Issue> = self
            .tracker
            .search_issues(&SearchQuery::new(jql.to_string(), req.max_results))
            .await?
            .into_iter()
            .filter(|i| i.status.category != StatusCategory::Done)
            .collect();
        issues.truncate(req.max_results as usize);

        Ok(format::backlog(project_key, &issues))
    }

    pub(super) async fn get_active_sprint(&self, req: &GetActiveSprintRequest) -> Result<String> {
        let project_key = req.project_key.trim();
        Ok(match self.active_sprint(project_key).await? {
            Some(sprint) => format::active_sprint(project_key, &sprint),
            None => format::no_active_sprint(project_key),
        })
    }

    pub(super) async fn get_sprint_issues_by_status(
        &self,
        req: &GetSprintIssuesByStatusRequest,
    ) -> Result<String> {
        let project_key = req.project_key.trim();
        let Some(sprint) = self.active_sprint(project_key).await? else {
            return Ok(format::no_active_sprint(project_key));
        };

        let status = req.status.as_deref().map(str::trim);
        let mut jql = Jql::new()
            .equals("project", project_key)
            .equals_id("sprint", sprint.id);
        if let Some(status) = status {
            jql = jql.equals("status", status);
        }
        let jql = jql.order_by("status", Order::Asc);

        let mut issues = self
            .tracker
            .search_issues(&SearchQuery::new(jql.to_string(), SPRINT_ISSUE_LIMIT))
            .await?;
        issues.truncate(SPRINT_ISSUE_LIMIT as usize);

        if let Some(status) = status {
            return Ok(format::sprint_issues_with_status(&sprint, status, &issues));
        }
        if issues.is_empty() {
            return Ok(format::no_sprint_issues(&sprint));
        }

        let (mut to_do, mut in_progress, mut done) = (Vec::new(), Vec::new(), Vec::new());
        for issue in issues {
            match Bucket::for_status(&issue.status.name) {
                Bucket::ToDo => to_do.push(issue),
                Bucket::InProgress => in_progress.push(issue),
                Bucket::Done => done.push(issue),
            }
        }
        Ok(format::sprint_buckets(&sprint, &to_do, &in_progress, &done))
    }

    pub(super) async fn move_issue_sprint_backlog(
        &self,
        req: &MoveIssueSprintBacklogRequest,
    ) -> Result<String> {
        let target: MoveTarget = req.move_to.parse()?;
        let key = req.issue_id.trim();
        let project_key = req.project_key.trim();

        // Fails with not-found before anything is changed
        let issue = self.tracker.get_issue(key).await?;

        let mut fields = Map::new();
        match target {
            MoveTarget::Backlog => {
                fields.insert(self.sprint_field.clone(), Value::Null);
                self.tracker.update_fields(&issue.key, fields).await?;
                Ok(format::moved_to_backlog(&issue.key))
            }
            MoveTarget::Sprint => {
                let Some(sprint) = self.active_sprint(project_key).await? else {
                    return Err(AssistantError::Validation(format!(
                        "No active sprint found for project {project_key}; {} was not moved.",
                        issue.key
                    )));
                };
                fields.insert(self.sprint_field.clone(), json!(sprint.id));
                self.tracker.update_fields(&issue.key, fields).await?;
                Ok(format::moved_to_sprint(&issue.key, &sprint))
            }
        }
    }
}
