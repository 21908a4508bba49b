use thiserror::Error;

/// Coarse classification of a failure, used when rendering tool results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    NotFound,
    Validation,
    Transport,
    Other,
}

#[derive(Error, Debug)]
pub enum AssistantError {
    // Tracker errors
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("Jira API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // Dispatch errors
    #[error("language model error: {0}")]
    Llm(String),

    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("invalid arguments for tool '{tool}': {message}")]
    InvalidToolArguments { tool: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AssistantError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AssistantError::Authentication(_) => ErrorCategory::Authentication,
            AssistantError::NotFound(_) => ErrorCategory::NotFound,
            AssistantError::Validation(_)
            | AssistantError::UnknownTool(_)
            | AssistantError::InvalidToolArguments { .. } => ErrorCategory::Validation,
            AssistantError::Transport(_) | AssistantError::Http(_) => ErrorCategory::Transport,
            _ => ErrorCategory::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(
            AssistantError::Authentication("bad token".into()).category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            AssistantError::NotFound("PROJ-1".into()).category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            AssistantError::UnknownTool("delete_everything".into()).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            AssistantError::Transport("connection reset".into()).category(),
            ErrorCategory::Transport
        );
        assert_eq!(
            AssistantError::Llm("boom".into()).category(),
            ErrorCategory::Other
        );
    }

    #[test]
    fn test_validation_message_is_bare() {
        let err = AssistantError::Validation("Invalid option! Use 'backlog' or 'sprint'.".into());
        assert_eq!(err.to_string(), "Invalid option! Use 'backlog' or 'sprint'.");
    }
}
