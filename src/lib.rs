#[macro_use]
mod macros;

pub mod agent;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod jira;
pub mod llm;
pub mod tools;

pub use agent::{ConversationMemory, DispatchAgent, Speaker, Turn};
pub use chat::{ChatSession, TypingRenderer};
pub use config::Config;
pub use error::{AssistantError, ErrorCategory, Result};
pub use jira::{IssueTracker, JiraClient};
pub use llm::{LanguageModel, OpenAiModel};
pub use tools::{ToolCall, ToolSet};
