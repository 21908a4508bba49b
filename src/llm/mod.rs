//! Language model access.
//!
//! The agent and the summarization tools only see the `LanguageModel` trait;
//! `OpenAiModel` is the production implementation.

pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use openai::OpenAiModel;

/// Role in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Definition of a tool offered to the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool's arguments
    pub parameters: serde_json::Value,
}

/// A tool the model asked to run
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// What the model decided for one turn
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// Plain text answer, no tool
    Text(String),
    /// Exactly one tool selected
    ToolCall(ToolInvocation),
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Single-turn completion of a composed prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// One chat turn with the tool catalog available
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<ModelReply>;
}
