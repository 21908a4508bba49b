//! The closed set of tools the model may select.
//!
//! Each tool is declared once: its wire name, its description and its request
//! type. From that single list we derive the `ToolCall` enum, the name lookup
//! used to reject unknown tools, and the JSON schemas offered to the model.

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{AssistantError, Result};
use crate::llm::ToolDefinition;

use super::requests::*;

/// Build the definition offered to the model for one request type
fn definition<T: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let mut schema = schema_for!(T);
    // Function parameters only need the object schema itself
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        parameters: schema.to_value(),
    }
}

macro_rules! define_tools {
    ($( $variant:ident($req:ty) => $name:literal, $desc:literal; )+) => {
        /// A validated request to run exactly one tool
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(tag = "name", content = "arguments")]
        pub enum ToolCall {
            $(
                #[serde(rename = $name)]
                $variant($req),
            )+
        }

        impl ToolCall {
            /// Every tool name, in catalog order
            pub const NAMES: &'static [&'static str] = &[$($name),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(ToolCall::$variant(_) => $name,)+
                }
            }

            pub(crate) fn validate(&self) -> Result<()> {
                match self {
                    $(ToolCall::$variant(req) => req.validate(),)+
                }
            }
        }

        /// Definitions for every tool, in catalog order
        pub fn definitions() -> Vec<ToolDefinition> {
            vec![$(definition::<$req>($name, $desc),)+]
        }
    };
}

define_tools! {
    CloseIssue(CloseIssueRequest) => "close_issue",
        "Close an issue by applying its 'Done' or 'Closed' transition.";
    CreateIssue(CreateIssueRequest) => "create_issue",
        "Create a new issue in a project. Returns the new issue key.";
    UpdateIssueStatus(UpdateIssueStatusRequest) => "update_issue_status",
        "Move an issue to a new status by applying the transition with that name.";
    GetIssueStatus(GetIssueStatusRequest) => "get_issue_status",
        "Get the current status of an issue.";
    SummarizeIssue(SummarizeIssueRequest) => "summarize_issue",
        "Summarize an issue from its summary, status, description and most recent comments.";
    SummarizeLastReportedIssue(SummarizeLastReportedIssueRequest) => "summarize_last_reported_issue",
        "Summarize the most recently created issue reported by a user.";
    GetBacklogIssues(GetBacklogIssuesRequest) => "get_backlog_issues",
        "List open issues in a project's backlog (not in any sprint), newest first.";
    GetActiveSprint(GetActiveSprintRequest) => "get_active_sprint",
        "Get the active sprint of a project's board.";
    GetSprintIssuesByStatus(GetSprintIssuesByStatusRequest) => "get_sprint_issues_by_status",
        "List issues in the project's active sprint, filtered by status or grouped into To Do, In Progress and Done.";
    MoveIssueSprintBacklog(MoveIssueSprintBacklogRequest) => "move_issue_sprint_backlog",
        "Move an issue into the project's active sprint or back to the backlog.";
}

impl ToolCall {
    /// Parse a model-selected tool name and its JSON arguments.
    ///
    /// Unknown names fail with `UnknownTool`; arguments that do not match the
    /// tool's request type fail with `InvalidToolArguments`.
    pub fn parse(name: &str, arguments: Value) -> Result<Self> {
        if !Self::NAMES.contains(&name) {
            return Err(AssistantError::UnknownTool(name.to_string()));
        }

        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        serde_json::from_value(json!({ "name": name, "arguments": arguments })).map_err(|e| {
            AssistantError::InvalidToolArguments {
                tool: name.to_string(),
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tool() {
        let call = ToolCall::parse("get_issue_status", json!({ "issue_id": "PROJ-7" })).unwrap();
        assert_eq!(
            call,
            ToolCall::GetIssueStatus(GetIssueStatusRequest {
                issue_id: "PROJ-7".to_string()
            })
        );
        assert_eq!(call.name(), "get_issue_status");
    }

    #[test]
    fn test_parse_applies_defaults() {
        let call = ToolCall::parse(
            "create_issue",
            json!({ "project_key": "PROJ", "summary": "Login fails" }),
        )
        .unwrap();
        match call {
            ToolCall::CreateIssue(req) => {
                assert_eq!(req.issue_type, "Task");
                assert!(req.description.is_none());
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = ToolCall::parse("delete_project", json!({})).unwrap_err();
        assert!(matches!(err, AssistantError::UnknownTool(ref n) if n == "delete_project"));
    }

    #[test]
    fn test_parse_missing_argument() {
        let err = ToolCall::parse("close_issue", Value::Null).unwrap_err();
        assert!(matches!(
            err,
            AssistantError::InvalidToolArguments { ref tool, .. } if tool == "close_issue"
        ));
    }

    #[test]
    fn test_parse_wrong_argument_type() {
        let err = ToolCall::parse(
            "get_backlog_issues",
            json!({ "project_key": "PROJ", "max_results": "many" }),
        )
        .unwrap_err();
        assert!(matches!(err, AssistantError::InvalidToolArguments { .. }));
    }

    #[test]
    fn test_definitions_cover_every_tool() {
        let defs = definitions();
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ToolCall::NAMES);
        assert_eq!(names.len(), 10);

        for def in &defs {
            assert!(!def.description.is_empty());
            assert_eq!(def.parameters["type"], "object", "{}", def.name);
            assert!(def.parameters.get("$schema").is_none());
            assert!(def.parameters.get("title").is_none());
        }
    }

    #[test]
    fn test_schema_marks_required_fields() {
        let defs = definitions();
        let create = defs.iter().find(|d| d.name == "create_issue").unwrap();
        let required: Vec<&str> = create.parameters["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"project_key"));
        assert!(required.contains(&"summary"));
        assert!(!required.contains(&"issue_type"));
    }
}
