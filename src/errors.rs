use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, time::Duration};
use thiserror::Error;
use url::Url;

use crate::api::TransportError;

/// One entry of the service's `errors` array.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Cause {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "details")]
    pub detail: String,
}

impl Cause {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }

    /// The service mostly sends objects, but plain strings show up in
    /// the `errors` array too.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(title) => Self::new(title.clone(), ""),
            Value::Object(_) => Self::deserialize(value).unwrap_or_else(|_| {
                Self::new("Unrecognized error", value.to_string())
            }),
            other => Self::new("Unrecognized error", other.to_string()),
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.title.is_empty(), self.detail.is_empty()) {
            (false, false) => write!(f, "{}: {}", self.title, self.detail),
            (false, true) => write!(f, "{}", self.title),
            (true, false) => write!(f, "{}", self.detail),
            (true, true) => write!(f, "(no detail)"),
        }
    }
}

fn describe_causes(causes: &[Cause]) -> String {
    if causes.is_empty() {
        return "no error detail returned".to_owned();
    }
    causes
        .iter()
        .map(|cause| format!("\n  - {cause}"))
        .collect::<String>()
}

fn describe_status(status: &Option<reqwest::StatusCode>) -> String {
    status.map_or_else(String::new, |status| format!(" with {status}"))
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Local,
    Remote,
    Transport,
    Malformed,
    Timeout,
}

/// Failure of a single accessor call or of a whole run.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ErrorInfo {
    #[error("[E101] Invalid request: {message}\n\nSuggestions:\n  • Check which of the alternative fields you supplied\n  • Supply exactly one field of each alternative pair")]
    Local { message: String },

    #[error("[E102] Service rejected the request{}: {}", describe_status(.status), describe_causes(.causes))]
    Remote {
        status: Option<reqwest::StatusCode>,
        causes: Vec<Cause>,
    },

    #[error("[E103] Request could not be delivered: {message}\n\nSuggestions:\n  • Check your network connection\n  • Verify the API host is reachable")]
    Transport { message: String },

    #[error("[E104] Unexpected response payload: {message}")]
    Malformed { message: String },

    #[error("[E105] Timed out after {attempts} attempts ({waited:?}) waiting for {subject} to finish processing\n\nSuggestions:\n  • The job may still complete, check its status later\n  • Increase the attempt budget or poll interval")]
    Timeout {
        subject: String,
        attempts: u32,
        waited: Duration,
    },
}

impl ErrorInfo {
    pub fn local(message: impl Into<String>) -> Self {
        Self::Local {
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Local { .. } => ErrorKind::Local,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Malformed { .. } => ErrorKind::Malformed,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Local { .. } => "E101",
            Self::Remote { .. } => "E102",
            Self::Transport { .. } => "E103",
            Self::Malformed { .. } => "E104",
            Self::Timeout { .. } => "E105",
        }
    }

    /// Ordered cause list; locally produced errors get a synthesized one.
    pub fn causes(&self) -> Vec<Cause> {
        match self {
            Self::Remote { causes, .. } => causes.clone(),
            Self::Local { message } => vec![Cause::new("Invalid request", message.clone())],
            Self::Transport { message } => vec![Cause::new("Transport failure", message.clone())],
            Self::Malformed { message } => vec![Cause::new("Malformed response", message.clone())],
            Self::Timeout {
                subject, waited, ..
            } => vec![Cause::new(
                format!("Timed out waiting for {subject}"),
                format!(
                    "After {waited:?}, the {subject} never completed, and that may signify a greater issue"
                ),
            )],
        }
    }
}

impl From<TransportError> for ErrorInfo {
    fn from(err: TransportError) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}

/// Errors raised while building a client, before any request is made.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("[E001] Invalid base URL: {0}\n\nSuggestions:\n  • Provide a valid HTTP or HTTPS URL\n  • Example: https://withpersona.com/api/v1")]
    CannotBeBase(Url),

    #[error("[E002] Invalid URL format: {0}\n\nSuggestions:\n  • Use absolute URLs with protocol (http:// or https://)")]
    InvalidUrl(#[from] url::ParseError),

    #[error("[E003] No API key configured\n\nSuggestions:\n  • Pass --api-key\n  • Or export PERSONA_API_KEY")]
    MissingApiKey,

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}

impl ClientError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CannotBeBase(_) => "E001",
            Self::InvalidUrl(_) => "E002",
            Self::MissingApiKey => "E003",
            Self::Reqwest(_) => "E999",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn test_cause_from_object_accepts_details_alias() {
        let cause = Cause::from_value(&json!({"title": "Bad", "details": "missing tin"}));
        assert_eq!(cause, Cause::new("Bad", "missing tin"));
    }

    #[test]
    fn test_cause_from_plain_string() {
        let cause = Cause::from_value(&json!("Record not found"));
        assert_eq!(cause.title, "Record not found");
        assert!(cause.detail.is_empty());
    }

    #[test]
    fn test_remote_error_display_lists_causes() {
        let error = ErrorInfo::Remote {
            status: Some(StatusCode::UNPROCESSABLE_ENTITY),
            causes: vec![Cause::new("Invalid", "tin is malformed")],
        };
        let message = format!("{error}");
        assert!(message.contains("[E102]"));
        assert!(message.contains("422"));
        assert!(message.contains("Invalid: tin is malformed"));
    }

    #[test]
    fn test_timeout_error_synthesizes_cause() {
        let error = ErrorInfo::Timeout {
            subject: "report rep_1".to_owned(),
            attempts: 60,
            waited: Duration::from_secs(30),
        };
        assert_eq!(error.kind(), ErrorKind::Timeout);
        let causes = error.causes();
        assert_eq!(causes.len(), 1);
        assert_eq!(causes[0].title, "Timed out waiting for report rep_1");
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ErrorInfo::local("x").error_code(), "E101");
        assert_eq!(ClientError::MissingApiKey.error_code(), "E003");
    }
}
