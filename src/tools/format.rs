//! Rendering of tool results as chat text.
//!
//! Every message a tool returns is built here so the markers stay consistent:
//! failures always start with `❌`, successes with a marker of their own.

use crate::error::{AssistantError, ErrorCategory};
use crate::jira::{Comment, Issue, Sprint, Transition};

pub const FAILURE_MARKER: &str = "❌";

/// Render a failure. Validation and not-found messages are shown as-is.
pub fn failure(err: &AssistantError) -> String {
    match err.category() {
        ErrorCategory::Validation | ErrorCategory::NotFound => {
            format!("{FAILURE_MARKER} {err}")
        }
        _ => format!("{FAILURE_MARKER} Error: {err}"),
    }
}

pub fn is_failure(text: &str) -> bool {
    text.starts_with(FAILURE_MARKER)
}

/// `- KEY: summary`
pub fn issue_line(issue: &Issue) -> String {
    format!("- {}: {}", issue.key, issue.summary)
}

fn issue_lines(issues: &[Issue]) -> String {
    issues.iter().map(issue_line).collect::<Vec<_>>().join("\n")
}

/// Transition names verbatim, comma separated
pub fn transition_names(transitions: &[Transition]) -> String {
    if transitions.is_empty() {
        return "none".to_string();
    }
    transitions
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn closed(key: &str) -> String {
    format!("✅ Issue {key} has been closed.")
}

pub fn created(key: &str) -> String {
    format!("🎉 Issue {key} created successfully!")
}

pub fn status_updated(key: &str, status: &str) -> String {
    format!("🔄 Issue {key} updated to '{status}'.")
}

pub fn current_status(key: &str, status: &str) -> String {
    format!("📌 Issue {key} is currently in status: {status}")
}

pub fn summary(key: &str, text: &str) -> String {
    format!("📌 **Issue Summary for {key}:**\n{}", text.trim())
}

pub fn backlog(project_key: &str, issues: &[Issue]) -> String {
    if issues.is_empty() {
        return format!("📂 No backlog issues found in {project_key}.");
    }
    format!(
        "📂 **Backlog Issues in {project_key}:**\n{}",
        issue_lines(issues)
    )
}

pub fn active_sprint(project_key: &str, sprint: &Sprint) -> String {
    format!(
        "🚀 Active Sprint in {project_key}: {} (ID: {})",
        sprint.name, sprint.id
    )
}

pub fn no_active_sprint(project_key: &str) -> String {
    format!("⏳ No active sprint found for project {project_key}.")
}

pub fn no_sprint_issues(sprint: &Sprint) -> String {
    format!("📭 No issues found in active sprint {}.", sprint.name)
}

pub fn sprint_issues_with_status(sprint: &Sprint, status: &str, issues: &[Issue]) -> String {
    if issues.is_empty() {
        return format!(
            "📭 No issues with status '{status}' in active sprint {}.",
            sprint.name
        );
    }
    format!(
        "🚀 **Issues in Active Sprint ({})**\n🟢 **Status: {status}**\n{}",
        sprint.name,
        issue_lines(issues)
    )
}

/// Grouped sprint issues, one labeled section per bucket
pub fn sprint_buckets(sprint: &Sprint, to_do: &[Issue], in_progress: &[Issue], done: &[Issue]) -> String {
    let section = |label: &str, issues: &[Issue]| {
        let body = if issues.is_empty() {
            "✅ None".to_string()
        } else {
            issue_lines(issues)
        };
        format!("{label}\n{body}")
    };

    [
        format!("🚀 **Issues in Active Sprint ({})**", sprint.name),
        section("📝 **To Do:**", to_do),
        section("🔄 **In Progress:**", in_progress),
        section("✅ **Done:**", done),
    ]
    .join("\n\n")
}

pub fn moved_to_backlog(key: &str) -> String {
    format!("📤 Issue {key} has been moved to the backlog.")
}

pub fn moved_to_sprint(key: &str, sprint: &Sprint) -> String {
    format!("🚀 Issue {key} has been moved to sprint **{}**.", sprint.name)
}

fn comment_line(comment: &Comment) -> String {
    match &comment.author {
        Some(author) => format!("- {author}: {}", comment.body.trim()),
        None => format!("- {}", comment.body.trim()),
    }
}

/// The fixed summarization prompt for an issue
pub fn summary_prompt(issue: &Issue, recent: &[Comment]) -> String {
    let description = issue
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("No description available.");
    let comments = if recent.is_empty() {
        "No recent comments".to_string()
    } else {
        recent.iter().map(comment_line).collect::<Vec<_>>().join("\n")
    };

    format!(
        "Summarize the following Jira issue:\n\n\
         **Issue ID:** {}\n\
         **Summary:** {}\n\
         **Status:** {}\n\
         **Description:** {description}\n\
         **Recent Comments:**\n{comments}",
        issue.key, issue.summary, issue.status.name
    )
}
