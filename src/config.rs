//! Top-level application configuration.
//!
//! Configuration is stored in `config.yaml` under the platform config
//! directory (or the path given by `--config` / `JIRA_ASSISTANT_CONFIG`) and
//! includes:
//! - Jira server, credentials and the sprint custom field
//! - Language model credentials and model selection
//! - Chat rendering settings

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, Result};

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "JIRA_ASSISTANT_CONFIG";

/// Jira's default custom field holding sprint membership
pub const DEFAULT_SPRINT_FIELD: &str = "customfield_10020";

pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub jira: JiraConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    /// HTTP timeout in seconds for tracker and model calls (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_timeout() -> u64 {
    30
}

/// Jira connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct JiraConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Custom field used to assign an issue to a sprint
    #[serde(default = "default_sprint_field")]
    pub sprint_field: String,
}

fn default_sprint_field() -> String {
    DEFAULT_SPRINT_FIELD.to_string()
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            server: None,
            email: None,
            api_token: None,
            sprint_field: default_sprint_field(),
        }
    }
}

impl fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraConfig")
            .field("server", &self.server)
            .field("email", &self.email)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("sprint_field", &self.sprint_field)
            .finish()
    }
}

/// Language model settings
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub temperature: f32,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_LLM_BASE_URL.to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            temperature: 0.0,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Chat surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Per-character delay of the typing effect in milliseconds (0 disables it)
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,

    /// Feed tool output back to the model for a final conversational answer
    #[serde(default)]
    pub post_process_tool_results: bool,
}

fn default_typing_delay_ms() -> u64 {
    50
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: default_typing_delay_ms(),
            post_process_tool_results: false,
        }
    }
}

/// Read a non-empty environment variable
fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Get the path to the config file
    ///
    /// `JIRA_ASSISTANT_CONFIG` wins over the platform config directory. When
    /// no config directory can be determined, falls back to `./config.yaml`.
    pub fn default_path() -> PathBuf {
        if let Some(path) = env_value(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        ProjectDirs::from("", "", "jira-assistant")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .unwrap_or_else(|| PathBuf::from("config.yaml"))
    }

    /// Load configuration from `path` (or the default path), returning the
    /// default configuration if the file does not exist
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            tracing::debug!("no config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            AssistantError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                AssistantError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            AssistantError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // Set restrictive permissions on Unix (owner read/write only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, permissions).map_err(|e| {
                AssistantError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to set permissions on config at {}: {}", path.display(), e),
                ))
            })?;
        }

        Ok(())
    }

    /// Jira base URL from environment or config file
    pub fn jira_server(&self) -> Option<String> {
        env_value("JIRA_SERVER").or_else(|| self.jira.server.clone())
    }

    /// Jira account email from environment or config file
    pub fn jira_email(&self) -> Option<String> {
        env_value("JIRA_EMAIL").or_else(|| self.jira.email.clone())
    }

    /// Jira API token from environment or config file
    pub fn jira_api_token(&self) -> Option<String> {
        env_value("JIRA_API_TOKEN").or_else(|| self.jira.api_token.clone())
    }

    /// OpenAI API key from environment or config file
    pub fn llm_api_key(&self) -> Option<String> {
        env_value("OPENAI_API_KEY").or_else(|| self.llm.api_key.clone())
    }

    pub fn llm_model(&self) -> String {
        env_value("OPENAI_MODEL").unwrap_or_else(|| self.llm.model.clone())
    }

    pub fn llm_base_url(&self) -> String {
        env_value("OPENAI_BASE_URL").unwrap_or_else(|| self.llm.base_url.clone())
    }

    /// Get the HTTP timeout duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.chat.typing_delay_ms)
    }
}
