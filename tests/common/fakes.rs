//! In-memory stand-ins for the tracker and the language model.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use jira_assistant::error::{AssistantError, Result};
use jira_assistant::jira::{
    Board, Comment, CreatedIssue, Issue, IssueStatus, IssueTracker, NewIssue, SearchQuery, Sprint,
    SprintState, StatusCategory, Transition,
};
use jira_assistant::llm::{LanguageModel, Message, ModelReply, ToolDefinition, ToolInvocation};

// ============================================================================
// Fixtures
// ============================================================================

pub fn issue(key: &str, summary: &str, status: &str) -> Issue {
    let category = match status.to_lowercase().as_str() {
        "done" | "closed" => StatusCategory::Done,
        "to do" | "open" | "backlog" => StatusCategory::ToDo,
        _ => StatusCategory::InProgress,
    };
    Issue {
        key: key.to_string(),
        summary: summary.to_string(),
        description: None,
        status: IssueStatus::new(status, category),
        comments: vec![],
    }
}

pub fn comment(author: &str, body: &str) -> Comment {
    Comment {
        author: Some(author.to_string()),
        body: body.to_string(),
    }
}

pub fn sprint(id: u64, name: &str, state: SprintState) -> Sprint {
    Sprint {
        id,
        name: name.to_string(),
        state,
    }
}

// ============================================================================
// FakeTracker
// ============================================================================

type FailureFn = Arc<dyn Fn() -> AssistantError + Send + Sync>;

#[derive(Default)]
struct TrackerState {
    issues: Vec<Issue>,
    transitions: HashMap<String, Vec<Transition>>,
    boards: Vec<Board>,
    sprints: HashMap<u64, Vec<Sprint>>,
    search_results: Vec<Issue>,
    next_number: u64,

    calls: Vec<&'static str>,
    applied: Vec<(String, String)>,
    created: Vec<NewIssue>,
    updates: Vec<(String, Map<String, Value>)>,
    queries: Vec<SearchQuery>,
}

/// An issue tracker held in memory that records every call
pub struct FakeTracker {
    state: Mutex<TrackerState>,
    failure: Option<FailureFn>,
}

impl Default for FakeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTracker {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TrackerState {
                next_number: 100,
                ..Default::default()
            }),
            failure: None,
        }
    }

    /// Every call fails with the error produced by `make`
    pub fn failing(make: impl Fn() -> AssistantError + Send + Sync + 'static) -> Self {
        Self {
            failure: Some(Arc::new(make)),
            ..Self::new()
        }
    }

    pub fn with_issue(self, issue: Issue) -> Self {
        self.state.lock().unwrap().issues.push(issue);
        self
    }

    pub fn with_transitions(self, key: &str, names: &[&str]) -> Self {
        let transitions = names
            .iter()
            .enumerate()
            .map(|(i, name)| Transition {
                id: format!("{}", (i + 1) * 10 + 1),
                name: name.to_string(),
            })
            .collect();
        self.state
            .lock()
            .unwrap()
            .transitions
            .insert(key.to_string(), transitions);
        self
    }

    pub fn with_board(self, id: u64, name: &str) -> Self {
        self.state.lock().unwrap().boards.push(Board {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_sprint(self, board_id: u64, sprint: Sprint) -> Self {
        self.state
            .lock()
            .unwrap()
            .sprints
            .entry(board_id)
            .or_default()
            .push(sprint);
        self
    }

    pub fn with_search_results(self, issues: Vec<Issue>) -> Self {
        self.state.lock().unwrap().search_results = issues;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn applied(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().applied.clone()
    }

    pub fn created(&self) -> Vec<NewIssue> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn updates(&self) -> Vec<(String, Map<String, Value>)> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn queries(&self) -> Vec<SearchQuery> {
        self.state.lock().unwrap().queries.clone()
    }

    fn begin(&self, call: &'static str) -> Result<std::sync::MutexGuard<'_, TrackerState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match &self.failure {
            Some(make) => Err(make()),
            None => Ok(state),
        }
    }
}

fn find_issue<'a>(state: &'a TrackerState, key: &str) -> Result<&'a Issue> {
    state
        .issues
        .iter()
        .find(|i| i.key.eq_ignore_ascii_case(key))
        .ok_or_else(|| AssistantError::NotFound(format!("issue {key} not found")))
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn get_issue(&self, key: &str) -> Result<Issue> {
        let state = self.begin("get_issue")?;
        find_issue(&state, key).cloned()
    }

    async fn transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let state = self.begin("transitions")?;
        find_issue(&state, key)?;
        Ok(state.transitions.get(key).cloned().unwrap_or_default())
    }

    async fn apply_transition(&self, key: &str, transition_id: &str) -> Result<()> {
        let mut state = self.begin("apply_transition")?;
        state
            .applied
            .push((key.to_string(), transition_id.to_string()));
        Ok(())
    }

    async fn create_issue(&self, new: &NewIssue) -> Result<CreatedIssue> {
        let mut state = self.begin("create_issue")?;
        let number = state.next_number;
        state.next_number += 1;

        let key = format!("{}-{number}", new.project_key);
        state.created.push(new.clone());
        state.issues.push(issue(&key, &new.summary, "To Do"));
        Ok(CreatedIssue {
            id: (10_000 + number).to_string(),
            key,
        })
    }

    async fn search_issues(&self, query: &SearchQuery) -> Result<Vec<Issue>> {
        let mut state = self.begin("search_issues")?;
        state.queries.push(query.clone());
        Ok(state
            .search_results
            .iter()
            .take(query.max_results as usize)
            .cloned()
            .collect())
    }

    async fn boards(&self, _name: &str) -> Result<Vec<Board>> {
        // Jira matches board names loosely, so hand back everything
        let state = self.begin("boards")?;
        Ok(state.boards.clone())
    }

    async fn sprints(&self, board_id: u64, wanted: Option<SprintState>) -> Result<Vec<Sprint>> {
        let state = self.begin("sprints")?;
        Ok(state
            .sprints
            .get(&board_id)
            .into_iter()
            .flatten()
            .filter(|s| wanted.is_none_or(|w| s.state == w))
            .cloned()
            .collect())
    }

    async fn update_fields(&self, key: &str, fields: Map<String, Value>) -> Result<()> {
        let mut state = self.begin("update_fields")?;
        state.updates.push((key.to_string(), fields));
        Ok(())
    }
}

// ============================================================================
// FakeModel
// ============================================================================

/// A language model that plays back scripted replies
#[derive(Default)]
pub struct FakeModel {
    replies: Mutex<VecDeque<Result<ModelReply>>>,
    completions: Mutex<VecDeque<Result<String>>>,
    chats: Mutex<Vec<Vec<Message>>>,
    tool_counts: Mutex<Vec<usize>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_text(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(ModelReply::Text(text.to_string())));
        self
    }

    pub fn reply_tool(self, name: &str, arguments: Value) -> Self {
        let call = ToolInvocation {
            id: format!("call_{name}"),
            name: name.to_string(),
            arguments,
        };
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(ModelReply::ToolCall(call)));
        self
    }

    pub fn reply_error(self, err: AssistantError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn completion(self, text: &str) -> Self {
        self.completions
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        self
    }

    pub fn completion_error(self, err: AssistantError) -> Self {
        self.completions.lock().unwrap().push_back(Err(err));
        self
    }

    /// Messages sent on each `chat` call
    pub fn chats(&self) -> Vec<Vec<Message>> {
        self.chats.lock().unwrap().clone()
    }

    /// Number of tools offered on each `chat` call
    pub fn tool_counts(&self) -> Vec<usize> {
        self.tool_counts.lock().unwrap().clone()
    }

    /// Prompts sent to `complete`
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.completions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("A short summary.".to_string()))
    }

    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<ModelReply> {
        self.chats.lock().unwrap().push(messages.to_vec());
        self.tool_counts.lock().unwrap().push(tools.len());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ModelReply::Text(String::new())))
    }
}
