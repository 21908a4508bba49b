#![allow(dead_code)]

pub mod fakes;
pub mod snapshot;

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Environment variables that would leak the developer's real setup into tests
const ISOLATED_ENV: &[&str] = &[
    "JIRA_ASSISTANT_CONFIG",
    "JIRA_SERVER",
    "JIRA_EMAIL",
    "JIRA_API_TOKEN",
    "OPENAI_API_KEY",
    "OPENAI_MODEL",
    "OPENAI_BASE_URL",
    "RUST_LOG",
];

/// Helper struct to run jira-assistant commands against an isolated config file
pub struct AssistantTest {
    pub temp_dir: TempDir,
    binary_path: String,
}

impl AssistantTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        AssistantTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_jira-assistant").to_string(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config").join("config.yaml")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(&self.binary_path);
        for var in ISOLATED_ENV {
            command.env_remove(var);
        }
        command
            .arg("--config")
            .arg(self.config_path())
            .args(args)
            .current_dir(self.temp_dir.path())
            .output()
            .expect("Failed to execute jira-assistant command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, content: &str) {
        let path = self.config_path();
        fs::create_dir_all(path.parent().expect("config path has a parent"))
            .expect("Failed to create config directory");
        fs::write(path, content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_path()).expect("Failed to read config file")
    }
}
