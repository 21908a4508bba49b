//! Command handlers behind the CLI.

mod chat;
mod config;
mod tool;

pub use chat::{cmd_ask, cmd_chat};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use tool::{cmd_tool, cmd_tools};

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::agent::DispatchAgent;
use crate::chat::{ChatSession, TypingRenderer};
use crate::config::Config;
use crate::error::Result;
use crate::jira::{IssueTracker, JiraClient};
use crate::llm::{LanguageModel, OpenAiModel};
use crate::tools::ToolSet;

/// Settings shared by every command
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
    /// Whether replies are revealed with the typing effect
    pub typing: bool,
}

impl AppContext {
    pub fn load(config_path: Option<PathBuf>, typing: bool) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(Config::default_path);
        let config = Config::load(Some(&config_path))?;
        tracing::debug!("loaded config from {}: {:?}", config_path.display(), config);
        Ok(Self {
            config,
            config_path,
            typing,
        })
    }

    fn model(&self) -> Result<Arc<dyn LanguageModel>> {
        Ok(Arc::new(OpenAiModel::from_config(&self.config)?))
    }

    fn tool_set(&self, model: Arc<dyn LanguageModel>) -> Result<ToolSet> {
        let tracker: Arc<dyn IssueTracker> = Arc::new(JiraClient::from_config(&self.config)?);
        Ok(ToolSet::new(tracker, model).with_sprint_field(self.config.jira.sprint_field.clone()))
    }

    pub fn session(&self) -> Result<ChatSession> {
        let model = self.model()?;
        let tools = self.tool_set(Arc::clone(&model))?;
        let agent = DispatchAgent::new(model, tools)
            .with_post_processing(self.config.chat.post_process_tool_results);
        Ok(ChatSession::new(agent))
    }

    pub fn renderer(&self) -> TypingRenderer {
        if self.typing {
            TypingRenderer::new(self.config.typing_delay())
        } else {
            TypingRenderer::instant()
        }
    }
}

/// Output of a non-interactive command, printed as text or JSON
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, as_json: bool) -> Result<()> {
        match self.text {
            Some(text) if !as_json => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}
