//! Maps one user message to at most one tool call.
//!
//! The agent sends the system prompt, the conversation so far and the new
//! message to the model together with the tool catalog. A text reply is
//! returned as-is; a tool selection is parsed into a `ToolCall`, executed,
//! and the tool's text becomes the reply. There is no planning loop and no
//! retry: one model call picks the tool, and at most one more rewrites its
//! result when post-processing is enabled.

pub mod memory;

use std::sync::Arc;

use crate::error::{AssistantError, Result};
use crate::llm::{LanguageModel, Message, ModelReply, ToolDefinition};
use crate::tools::{ToolCall, ToolSet, definitions, format};

pub use memory::{ConversationMemory, Speaker, Turn};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a Jira assistant. \
When the user asks to create, close, transition, summarize, list or move issues, \
call exactly one of the available tools with arguments taken from the request and \
the conversation so far. If no tool fits, answer briefly in plain text. \
Never invent issue keys or project keys.";

pub struct DispatchAgent {
    model: Arc<dyn LanguageModel>,
    tools: ToolSet,
    definitions: Vec<ToolDefinition>,
    system_prompt: String,
    post_process: bool,
}

impl DispatchAgent {
    pub fn new(model: Arc<dyn LanguageModel>, tools: ToolSet) -> Self {
        Self {
            model,
            tools,
            definitions: definitions(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            post_process: false,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Rewrite successful tool results through the model before replying
    pub fn with_post_processing(mut self, enabled: bool) -> Self {
        self.post_process = enabled;
        self
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    fn messages(&self, input: &str, history: &ConversationMemory) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(history.to_messages());
        messages.push(Message::user(input));
        messages
    }

    /// Produce the assistant's reply to `input`.
    ///
    /// `history` holds the turns before this one. Tool failures, unknown
    /// tools and malformed arguments come back as `❌` text; only a failed
    /// model call is an error.
    pub async fn respond(&self, input: &str, history: &ConversationMemory) -> Result<String> {
        let messages = self.messages(input, history);

        let reply = match self.model.chat(&messages, &self.definitions).await {
            Ok(reply) => reply,
            Err(e @ AssistantError::InvalidToolArguments { .. }) => {
                tracing::warn!("model produced unusable tool arguments: {e}");
                return Ok(format::failure(&e));
            }
            Err(e) => return Err(e),
        };

        let invocation = match reply {
            ModelReply::Text(text) => return Ok(text),
            ModelReply::ToolCall(invocation) => invocation,
        };

        let call = match ToolCall::parse(&invocation.name, invocation.arguments) {
            Ok(call) => call,
            Err(e) => {
                tracing::warn!("rejected tool call {}: {e}", invocation.name);
                return Ok(format::failure(&e));
            }
        };

        tracing::info!("model selected {}", call.name());
        let result = self.tools.execute(&call).await;

        if self.post_process && !format::is_failure(&result) {
            return Ok(self.post_process_result(input, result).await);
        }
        Ok(result)
    }

    async fn post_process_result(&self, input: &str, result: String) -> String {
        let prompt = format!(
            "The user asked: {input}\n\n\
             The tool returned:\n{result}\n\n\
             Reply to the user in one or two sentences using only the information above. \
             Keep issue keys exactly as written."
        );
        match self.model.complete(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => result,
            Err(e) => {
                tracing::warn!("post-processing failed, returning raw tool result: {e}");
                result
            }
        }
    }
}
