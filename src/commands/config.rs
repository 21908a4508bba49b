//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value (secrets masked)
//! - `config set`: Set a value and save the file

use std::path::Path;

use owo_colors::OwoColorize;
use serde_json::json;
use url::Url;

use super::CommandOutput;
use crate::config::Config;
use crate::error::{AssistantError, Result};

const VALID_KEYS: &[&str] = &[
    "jira.server",
    "jira.email",
    "jira.api_token",
    "jira.sprint_field",
    "llm.api_key",
    "llm.model",
    "llm.base_url",
    "llm.temperature",
    "chat.typing_delay_ms",
    "chat.post_process_tool_results",
    "timeout",
];

const SECRET_KEYS: &[&str] = &["jira.api_token", "llm.api_key"];

/// Reject unknown keys, suggesting dot notation for `section_field` typos
fn validate_config_key(key: &str) -> Result<&str> {
    if VALID_KEYS.contains(&key) {
        return Ok(key);
    }

    if !key.contains('.')
        && let Some(pos) = key.find('_')
    {
        let dot_version = format!("{}.{}", &key[..pos], &key[pos + 1..]);
        if VALID_KEYS.contains(&dot_version.as_str()) {
            return Err(AssistantError::Config(format!(
                "invalid config key '{key}'. Use dot notation: '{dot_version}'"
            )));
        }
    }

    Err(AssistantError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_KEYS.join(", ")
    )))
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

/// Current effective value of a key, environment overrides applied
fn effective_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "jira.server" => config.jira_server(),
        "jira.email" => config.jira_email(),
        "jira.api_token" => config.jira_api_token(),
        "jira.sprint_field" => Some(config.jira.sprint_field.clone()),
        "llm.api_key" => config.llm_api_key(),
        "llm.model" => Some(config.llm_model()),
        "llm.base_url" => Some(config.llm_base_url()),
        "llm.temperature" => Some(config.llm.temperature.to_string()),
        "chat.typing_delay_ms" => Some(config.chat.typing_delay_ms.to_string()),
        "chat.post_process_tool_results" => {
            Some(config.chat.post_process_tool_results.to_string())
        }
        "timeout" => Some(config.timeout.to_string()),
        _ => None,
    }
}

fn display_value(key: &str, value: &str) -> String {
    if SECRET_KEYS.contains(&key) {
        mask_sensitive_value(value)
    } else {
        value.to_string()
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str, expected: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        AssistantError::Config(format!(
            "invalid value '{value}' for {key}. Expected: {expected}"
        ))
    })
}

fn parse_http_url(key: &str, value: &str) -> Result<String> {
    let url = Url::parse(value.trim())
        .map_err(|e| AssistantError::Config(format!("invalid URL '{value}' for {key}: {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(AssistantError::Config(format!(
            "{key} must be an http or https URL, got '{value}'"
        )));
    }
    Ok(value.trim().trim_end_matches('/').to_string())
}

/// Apply `key = value` to `config`
fn apply_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "jira.server" => config.jira.server = Some(parse_http_url(key, value)?),
        "jira.email" => config.jira.email = Some(value.trim().to_string()),
        "jira.api_token" => config.jira.api_token = Some(value.trim().to_string()),
        "jira.sprint_field" => config.jira.sprint_field = value.trim().to_string(),
        "llm.api_key" => config.llm.api_key = Some(value.trim().to_string()),
        "llm.model" => config.llm.model = value.trim().to_string(),
        "llm.base_url" => config.llm.base_url = parse_http_url(key, value)?,
        "llm.temperature" => {
            let temperature: f32 = parse_value(key, value, "a number between 0 and 2")?;
            if !(0.0..=2.0).contains(&temperature) {
                return Err(AssistantError::Config(format!(
                    "llm.temperature must be between 0 and 2, got {temperature}"
                )));
            }
            config.llm.temperature = temperature;
        }
        "chat.typing_delay_ms" => {
            config.chat.typing_delay_ms = parse_value(key, value, "milliseconds")?;
        }
        "chat.post_process_tool_results" => {
            config.chat.post_process_tool_results = parse_value(key, value, "true or false")?;
        }
        "timeout" => {
            let timeout: u64 = parse_value(key, value, "seconds")?;
            if timeout == 0 {
                return Err(AssistantError::Config("timeout must be at least 1 second".to_string()));
            }
            config.timeout = timeout;
        }
        _ => {
            return Err(AssistantError::Config(format!(
                "unknown config key '{key}'"
            )));
        }
    }
    Ok(())
}

/// Show current configuration
pub fn cmd_config_show(config_path: &Path, as_json: bool) -> Result<()> {
    let config = Config::load(Some(config_path))?;

    let mut json_values = serde_json::Map::new();
    let mut text_output = format!("{}\n\n", "Configuration:".cyan().bold());

    let mut section = "";
    for &key in VALID_KEYS {
        let current_section = key.split_once('.').map(|(s, _)| s).unwrap_or("");
        if current_section != section {
            if !section.is_empty() {
                text_output.push('\n');
            }
            if !current_section.is_empty() {
                text_output.push_str(&format!("{}:\n", current_section.cyan()));
            }
            section = current_section;
        }

        let field = key.split_once('.').map(|(_, f)| f).unwrap_or(key);
        let indent = if current_section.is_empty() { "" } else { "  " };
        match effective_value(&config, key) {
            Some(value) => {
                let shown = display_value(key, &value);
                text_output.push_str(&format!("{indent}{field}: {shown}\n"));
                json_values.insert(key.to_string(), json!(shown));
            }
            None => {
                text_output.push_str(&format!("{indent}{field}: {}\n", "not configured".dimmed()));
                json_values.insert(key.to_string(), serde_json::Value::Null);
            }
        }
    }

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", config_path.display()).dimmed()
    ));

    CommandOutput::new(json!({
        "values": json_values,
        "config_file": config_path.to_string_lossy(),
    }))
    .with_text(text_output)
    .print(as_json)
}

/// Get a specific configuration value
pub fn cmd_config_get(config_path: &Path, key: &str, as_json: bool) -> Result<()> {
    validate_config_key(key)?;
    let config = Config::load(Some(config_path))?;

    let Some(value) = effective_value(&config, key) else {
        return Err(AssistantError::Config(format!("{key} not set")));
    };

    let masked = SECRET_KEYS.contains(&key);
    let shown = display_value(key, &value);
    let text = if masked {
        format!("{shown} (masked - showing first 2 and last 2 characters)")
    } else {
        shown.clone()
    };

    CommandOutput::new(json!({
        "key": key,
        "value": shown,
        "configured": true,
        "masked": masked,
    }))
    .with_text(text)
    .print(as_json)
}

/// Set a configuration value
pub fn cmd_config_set(config_path: &Path, key: &str, value: &str, as_json: bool) -> Result<()> {
    validate_config_key(key)?;

    let mut config = Config::load(Some(config_path))?;
    apply_value(&mut config, key, value)?;
    config.save(config_path)?;
    tracing::info!("updated {key} in {}", config_path.display());

    let shown = display_value(key, value.trim());
    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    }))
    .with_text(format!("Set {} to {shown}", key.cyan()))
    .print(as_json)
}
