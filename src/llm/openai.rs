//! OpenAI chat-completions client.
//!
//! Works against any OpenAI-compatible `/chat/completions` endpoint. Tools
//! are offered as `function` tools with parallel calls disabled, so a reply
//! carries at most one tool call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AssistantError, Result};

use super::{LanguageModel, Message, ModelReply, Role, ToolDefinition, ToolInvocation};

pub struct OpenAiModel {
    client: Client,
    api_key: SecretBox<String>,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAiModel {
    /// Create a model client from configuration (environment variables win)
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.llm_api_key().ok_or_else(|| {
            AssistantError::Config(
                "OpenAI API key not configured. Set OPENAI_API_KEY or run: jira-assistant config set llm.api_key <key>".to_string(),
            )
        })?;

        Ok(Self::new(&api_key, config.timeout())?
            .with_base_url(&config.llm_base_url())
            .with_model(&config.llm_model())
            .with_temperature(config.llm.temperature))
    }

    pub fn new(api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            api_key: SecretBox::new(Box::new(api_key.to_string())),
            base_url: crate::config::DEFAULT_LLM_BASE_URL.to_string(),
            model: crate::config::DEFAULT_MODEL.to_string(),
            temperature: 0.0,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn convert_messages(messages: &[Message]) -> Vec<OpenAiMessage> {
        messages
            .iter()
            .map(|msg| OpenAiMessage {
                role: match msg.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                }
                .to_string(),
                content: Some(msg.content.clone()),
                tool_calls: None,
            })
            .collect()
    }

    fn convert_tools(tools: &[ToolDefinition]) -> Vec<OpenAiTool> {
        tools
            .iter()
            .map(|t| OpenAiTool {
                tool_type: "function".to_string(),
                function: OpenAiFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    }

    async fn send(&self, request: &OpenAiRequest) -> Result<OpenAiMessage> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| AssistantError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Llm(format!(
                "OpenAI API error {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let parsed: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Llm(format!("failed to parse response: {e}")))?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                "token usage: prompt={} completion={} total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| AssistantError::Llm("response contained no choices".to_string()))
    }
}

/// Turn an assistant message into a reply, keeping at most one tool call
fn into_reply(message: OpenAiMessage) -> Result<ModelReply> {
    let mut calls = message.tool_calls.unwrap_or_default();
    if calls.is_empty() {
        return Ok(ModelReply::Text(message.content.unwrap_or_default()));
    }

    if calls.len() > 1 {
        let ignored: Vec<&str> = calls[1..].iter().map(|c| c.function.name.as_str()).collect();
        tracing::warn!(
            "model requested {} tool calls; running only the first, ignoring {:?}",
            calls.len(),
            ignored
        );
    }
    let call = calls.swap_remove(0);

    let arguments = if call.function.arguments.trim().is_empty() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(&call.function.arguments).map_err(|e| {
            AssistantError::InvalidToolArguments {
                tool: call.function.name.clone(),
                message: format!("arguments are not valid JSON: {e}"),
            }
        })?
    };

    Ok(ModelReply::ToolCall(ToolInvocation {
        id: call.id,
        name: call.function.name,
        arguments,
    }))
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: Self::convert_messages(&[Message::user(prompt)]),
            temperature: self.temperature,
            tools: None,
            parallel_tool_calls: None,
        };
        let message = self.send(&request).await?;
        Ok(message.content.unwrap_or_default())
    }

    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<ModelReply> {
        let has_tools = !tools.is_empty();
        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: Self::convert_messages(messages),
            temperature: self.temperature,
            tools: has_tools.then(|| Self::convert_tools(tools)),
            parallel_tool_calls: has_tools.then_some(false),
        };
        tracing::debug!(
            "sending {} messages with {} tools to {}",
            messages.len(),
            tools.len(),
            self.model
        );
        into_reply(self.send(&request).await?)
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parallel_tool_calls: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiToolCall {
    id: String,
    #[serde(rename = "type", default)]
    call_type: String,
    function: OpenAiFunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Serialize)]
struct OpenAiTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAiFunction,
}

#[derive(Debug, Serialize)]
struct OpenAiFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
