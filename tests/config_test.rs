#[path = "common/mod.rs"]
mod common;

use common::AssistantTest;
use jira_assistant::config::{CONFIG_PATH_ENV, Config};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Config command tests
// ============================================================================

#[test]
fn test_config_show_empty() {
    let assistant = AssistantTest::new();

    let output = assistant.run_success(&["config", "show"]);
    assert!(output.contains("Configuration"));
    assert!(output.contains("not configured"));
    assert!(output.contains("customfield_10020"));
    assert!(output.contains("gpt-4-turbo"));
}

#[test]
fn test_config_set_and_get_server() {
    let assistant = AssistantTest::new();

    assistant.run_success(&["config", "set", "jira.server", "https://example.atlassian.net/"]);
    let output = assistant.run_success(&["config", "get", "jira.server"]);
    assert_eq!(output.trim(), "https://example.atlassian.net");
}

#[test]
fn test_config_secrets_are_masked() {
    let assistant = AssistantTest::new();

    let output = assistant.run_success(&["config", "set", "jira.api_token", "secret-token"]);
    assert!(output.contains("se...en"));
    assert!(!output.contains("secret-token"));

    let output = assistant.run_success(&["config", "get", "jira.api_token"]);
    assert!(output.contains("se...en"));
    assert!(output.contains("masked"));

    let output = assistant.run_success(&["config", "show"]);
    assert!(!output.contains("secret-token"));

    // The file keeps the real value
    assert!(assistant.read_config().contains("secret-token"));
}

#[test]
fn test_config_get_json() {
    let assistant = AssistantTest::new();

    assistant.run_success(&["config", "set", "llm.api_key", "sk-abcdef"]);
    let output = assistant.run_success(&["config", "get", "llm.api_key", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["key"], "llm.api_key");
    assert_eq!(value["value"], "sk...ef");
    assert_eq!(value["masked"], true);
}

#[test]
fn test_config_get_not_set() {
    let assistant = AssistantTest::new();

    let stderr = assistant.run_failure(&["config", "get", "jira.email"]);
    assert!(stderr.contains("not set"));
}

#[test]
fn test_config_set_invalid_key() {
    let assistant = AssistantTest::new();

    let stderr = assistant.run_failure(&["config", "set", "invalid.key", "value"]);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_rejects_underscore_keys() {
    let assistant = AssistantTest::new();

    let stderr = assistant.run_failure(&["config", "set", "jira_server", "https://x.example"]);
    assert!(stderr.contains("invalid config key"));
    assert!(stderr.contains("jira.server"));

    let stderr = assistant.run_failure(&["config", "set", "llm_api_key", "sk-1"]);
    assert!(stderr.contains("invalid config key"));
    assert!(stderr.contains("llm.api_key"));
}

#[test]
fn test_config_set_rejects_bad_values() {
    let assistant = AssistantTest::new();

    let stderr = assistant.run_failure(&["config", "set", "jira.server", "ftp://example.com"]);
    assert!(stderr.contains("http or https"));

    let stderr = assistant.run_failure(&["config", "set", "llm.temperature", "3.5"]);
    assert!(stderr.contains("between 0 and 2"));

    let stderr = assistant.run_failure(&["config", "set", "timeout", "0"]);
    assert!(stderr.contains("at least 1 second"));

    let stderr = assistant.run_failure(&["config", "set", "chat.post_process_tool_results", "maybe"]);
    assert!(stderr.contains("true or false"));
}

#[test]
fn test_config_file_created() {
    let assistant = AssistantTest::new();

    assistant.run_success(&["config", "set", "jira.email", "me@example.com"]);

    let config_path = assistant.config_path();
    assert!(config_path.exists(), "Config file should be created");

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("me@example.com"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&config_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_config_show_reads_existing_file() {
    let assistant = AssistantTest::new();
    assistant.write_config(
        r#"
jira:
  server: https://jira.internal.example
  sprint_field: customfield_10007
chat:
  typing_delay_ms: 0
"#,
    );

    let output = assistant.run_success(&["config", "show", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["values"]["jira.server"], "https://jira.internal.example");
    assert_eq!(value["values"]["jira.sprint_field"], "customfield_10007");
    assert_eq!(value["values"]["chat.typing_delay_ms"], "0");
    assert!(value["values"]["jira.api_token"].is_null());
}

// ============================================================================
// Environment overrides
// ============================================================================

fn clear_env() {
    // SAFETY: tests touching the environment are serialized
    unsafe {
        for var in ["JIRA_SERVER", "OPENAI_MODEL", "OPENAI_API_KEY", CONFIG_PATH_ENV] {
            std::env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn test_env_overrides_file_values() {
    clear_env();
    let mut config = Config::default();
    config.jira.server = Some("https://from-file.example".to_string());
    config.llm.model = "gpt-4o".to_string();

    unsafe {
        std::env::set_var("JIRA_SERVER", "https://from-env.example");
        std::env::set_var("OPENAI_MODEL", "gpt-4o-mini");
    }
    assert_eq!(config.jira_server().as_deref(), Some("https://from-env.example"));
    assert_eq!(config.llm_model(), "gpt-4o-mini");

    clear_env();
    assert_eq!(config.jira_server().as_deref(), Some("https://from-file.example"));
    assert_eq!(config.llm_model(), "gpt-4o");
}

#[test]
#[serial]
fn test_empty_env_value_is_ignored() {
    clear_env();
    let mut config = Config::default();
    config.llm.api_key = Some("sk-file".to_string());

    unsafe {
        std::env::set_var("OPENAI_API_KEY", "");
    }
    assert_eq!(config.llm_api_key().as_deref(), Some("sk-file"));
    clear_env();
}

#[test]
#[serial]
fn test_config_path_env() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.yaml");

    unsafe {
        std::env::set_var(CONFIG_PATH_ENV, &path);
    }
    assert_eq!(Config::default_path(), path);
    clear_env();
}
