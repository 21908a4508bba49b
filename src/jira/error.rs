//! Mapping of Jira HTTP failures onto the crate error taxonomy.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::AssistantError;

/// Jira's standard error payload
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraErrorBody {
    #[serde(default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

impl JiraErrorBody {
    /// Flatten into a single human-readable line
    pub fn message(&self) -> Option<String> {
        let mut parts: Vec<String> = self.error_messages.clone();
        parts.extend(self.errors.iter().map(|(field, msg)| format!("{field}: {msg}")));
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}

/// A non-success response from Jira.
///
/// Keeps the HTTP status so the failure can be categorized.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Build from a status and the raw response body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<JiraErrorBody>(body)
            .ok()
            .and_then(|b| b.message())
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    trimmed.chars().take(300).collect()
                }
            });
        Self { status, message }
    }

    /// Convert into an `AssistantError`, naming `resource` for 404s
    pub fn into_assistant_error(self, resource: &str) -> AssistantError {
        match self.status.as_u16() {
            401 | 403 => AssistantError::Authentication(format!(
                "Jira rejected the credentials (HTTP {}): {}",
                self.status.as_u16(),
                self.message
            )),
            404 => AssistantError::NotFound(format!("{resource} not found ({})", self.message)),
            400 => AssistantError::Validation(self.message),
            status => AssistantError::Api {
                status,
                message: self.message,
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status.as_u16(), self.message)
    }
}

/// Classify a transport-level reqwest failure
pub fn transport_error(err: reqwest::Error) -> AssistantError {
    if err.is_timeout() {
        AssistantError::Transport(format!("request to Jira timed out: {err}"))
    } else if err.is_connect() {
        AssistantError::Transport(format!("could not connect to Jira: {err}"))
    } else if err.is_decode() {
        AssistantError::Transport(format!("unexpected response from Jira: {err}"))
    } else {
        AssistantError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_message_from_jira_body() {
        let body = r#"{"errorMessages":["Issue does not exist or you do not have permission to see it."],"errors":{}}"#;
        let err = ApiError::from_response(StatusCode::NOT_FOUND, body);
        assert_eq!(
            err.message,
            "Issue does not exist or you do not have permission to see it."
        );
    }

    #[test]
    fn test_field_errors_are_joined() {
        let body = r#"{"errorMessages":[],"errors":{"issuetype":"Specify a valid issue type","summary":"required"}}"#;
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err.message,
            "issuetype: Specify a valid issue type; summary: required"
        );
    }

    #[test]
    fn test_non_json_body_falls_back() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.message, "Bad Gateway");

        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err.message, "<html>oops</html>");
    }

    #[test]
    fn test_status_categories() {
        let cases = [
            (StatusCode::UNAUTHORIZED, ErrorCategory::Authentication),
            (StatusCode::FORBIDDEN, ErrorCategory::Authentication),
            (StatusCode::NOT_FOUND, ErrorCategory::NotFound),
            (StatusCode::BAD_REQUEST, ErrorCategory::Validation),
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorCategory::Other),
        ];
        for (status, expected) in cases {
            let err = ApiError::from_response(status, "").into_assistant_error("issue PROJ-1");
            assert_eq!(err.category(), expected, "status {status}");
        }
    }

    #[test]
    fn test_not_found_names_resource() {
        let err = ApiError::from_response(StatusCode::NOT_FOUND, "")
            .into_assistant_error("issue PROJ-9");
        assert!(err.to_string().contains("issue PROJ-9"));
    }
}
